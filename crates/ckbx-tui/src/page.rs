//! Address page controller.
//!
//! Keeps the pagination state in step with the location's search string,
//! issues the address and transaction fetches for each new search, and
//! reconciles their results. Every fetch is issued under a generation number;
//! only results from the latest generation are applied.

use std::sync::atomic::{AtomicU64, Ordering};

use ckbx_core::{AddressSummary, PageParams, PaginationState, TransactionWrapper, cycle_page_size};

use crate::action::{FetchRequest, TransactionPage};
use crate::context::AppContext;
use crate::location::{History, Location};

/// How long fetch error toasts stay on screen.
const ERROR_TOAST_MS: u64 = 3000;

/// Generations are unique across page instances so a result issued for a
/// previous page can never match the current one.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// State of one mounted address page.
#[derive(Debug)]
pub struct AddressPage {
    address: String,
    summary: AddressSummary,
    transactions: Vec<TransactionWrapper>,
    total_transactions: u64,
    pagination: PaginationState,
    /// Search string of the last fetch cycle; `None` before the first one.
    synced_search: Option<String>,
    generation: u64,
    toast_errors: bool,
}

impl AddressPage {
    /// Mount the page for `address`. Pagination starts from the location so the
    /// pagination bar is right before the first fetch settles.
    pub fn mount(address: &str, location: &Location) -> Self {
        Self {
            address: address.to_string(),
            summary: AddressSummary::default(),
            transactions: Vec::new(),
            total_transactions: 1,
            pagination: PageParams::from_query(&location.search),
            synced_search: None,
            generation: 0,
            toast_errors: false,
        }
    }

    /// Also report failed fetches through toasts.
    pub fn with_error_toasts(mut self, enabled: bool) -> Self {
        self.toast_errors = enabled;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn summary(&self) -> &AddressSummary {
        &self.summary
    }

    pub fn transactions(&self) -> &[TransactionWrapper] {
        &self.transactions
    }

    pub fn total_transactions(&self) -> u64 {
        self.total_transactions
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn page_count(&self) -> u32 {
        self.pagination.page_count(self.total_transactions)
    }

    /// Run a fetch cycle if the search string changed since the last one.
    ///
    /// Returns the two requests to execute; empty when nothing changed.
    pub fn sync_location(
        &mut self,
        location: &Location,
        ctx: &mut dyn AppContext,
    ) -> Vec<FetchRequest> {
        if self.synced_search.as_deref() == Some(location.search.as_str()) {
            return Vec::new();
        }
        self.synced_search = Some(location.search.clone());
        self.pagination = PageParams::from_query(&location.search);
        self.generation = next_generation();

        tracing::debug!(
            "Loading {} page {} (size {}), generation {}",
            self.address,
            self.pagination.page_number,
            self.pagination.page_size,
            self.generation
        );

        vec![self.refresh_address(ctx), self.refresh_transactions(ctx)]
    }

    fn refresh_address(&self, ctx: &mut dyn AppContext) -> FetchRequest {
        ctx.show_loading();
        FetchRequest::AddressInfo {
            generation: self.generation,
            address: self.address.clone(),
        }
    }

    fn refresh_transactions(&self, ctx: &mut dyn AppContext) -> FetchRequest {
        ctx.show_loading();
        FetchRequest::Transactions {
            generation: self.generation,
            address: self.address.clone(),
            pagination: self.pagination,
        }
    }

    /// Settle an address fetch. Releases the loading indicator in every case.
    pub fn apply_address(
        &mut self,
        generation: u64,
        result: Result<AddressSummary, String>,
        ctx: &mut dyn AppContext,
    ) {
        ctx.hide_loading();
        if generation != self.generation {
            tracing::debug!(
                "Discarding stale address result (generation {} != {})",
                generation,
                self.generation
            );
            return;
        }
        match result {
            Ok(summary) => self.summary = summary,
            Err(e) => self.report_failure("address", &e, ctx),
        }
    }

    /// Settle a transaction fetch. Releases the loading indicator in every case.
    pub fn apply_transactions(
        &mut self,
        generation: u64,
        result: Result<TransactionPage, String>,
        ctx: &mut dyn AppContext,
    ) {
        ctx.hide_loading();
        if generation != self.generation {
            tracing::debug!(
                "Discarding stale transactions result (generation {} != {})",
                generation,
                self.generation
            );
            return;
        }
        match result {
            Ok(page) => {
                if let Some(total) = page.total {
                    self.total_transactions = total;
                }
                self.transactions = page.transactions;
            }
            Err(e) => self.report_failure("transactions", &e, ctx),
        }
    }

    fn report_failure(&self, what: &str, error: &str, ctx: &mut dyn AppContext) {
        tracing::warn!("Failed to load {} for {}: {}", what, self.address, error);
        if self.toast_errors {
            ctx.toast_message(&format!("Failed to load {}: {}", what, error), ERROR_TOAST_MS);
        }
    }

    /// Apply a page/size picked in the pagination bar.
    ///
    /// Updates the pagination state right away and pushes the matching
    /// location; the fetch happens when that location is synced.
    pub fn change_pagination(&mut self, page: u32, size: u32, history: &mut History) {
        self.pagination = PaginationState::new(page, size);
        history.push(Location::address(&self.address, Some(self.pagination)));
    }

    /// Pagination `delta` pages away, clamped to the existing pages.
    /// `None` when that is the current page.
    pub fn step(&self, delta: i64) -> Option<PaginationState> {
        let last = self.page_count() as i64;
        let target = (self.pagination.page_number as i64 + delta).clamp(1, last.max(1));
        self.with_page(target as u32)
    }

    /// Pagination for a quick-jump to `page`, clamped to the existing pages.
    pub fn jump_to(&self, page: u32) -> Option<PaginationState> {
        self.with_page(page.clamp(1, self.page_count()))
    }

    /// Pagination after switching to the next larger (`grow`) or smaller page size.
    /// The current page is clamped to the page count under the new size.
    pub fn resize(&self, grow: bool) -> Option<PaginationState> {
        let size = cycle_page_size(self.pagination.page_size, grow);
        if size == self.pagination.page_size {
            return None;
        }
        let resized = PaginationState::new(self.pagination.page_number, size);
        let page = resized
            .page_number
            .min(resized.page_count(self.total_transactions));
        Some(PaginationState::new(page, size))
    }

    fn with_page(&self, page: u32) -> Option<PaginationState> {
        (page != self.pagination.page_number)
            .then(|| PaginationState::new(page, self.pagination.page_size))
    }
}
