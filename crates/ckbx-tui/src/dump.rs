//! Non-interactive mode: run one fetch cycle and print the page to stdout.

use std::fmt::Write as _;

use ckbx_api::Fetcher;
use ckbx_core::{Network, format_timestamp_ms, shannon_to_ckb, signed_ckb};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use futures::future::join_all;

use crate::action::Action;
use crate::context::UiContext;
use crate::fetch::run_request;
use crate::location::{Location, Route};
use crate::page::AddressPage;
use crate::ui::lock_script_json;

/// Load the address page at `start` once and print it.
pub async fn run_dump(fetcher: &dyn Fetcher, network: Network, start: &Location) -> Result<()> {
    let (page, failures) = load_page(fetcher, start).await?;
    print!("{}", render_report(&page, network));

    if failures.is_empty() {
        Ok(())
    } else {
        Err(eyre!("{}", failures.join("; ")))
    }
}

/// Drive the page controller through one complete cycle.
/// Returns the page and the messages of failed fetches.
async fn load_page(fetcher: &dyn Fetcher, start: &Location) -> Result<(AddressPage, Vec<String>)> {
    let Route::Address(address) = Route::resolve(&start.path) else {
        return Err(eyre!("Not an address location: {}", start.href()));
    };

    let mut context = UiContext::new();
    let mut page = AddressPage::mount(&address, start);
    let requests = page.sync_location(start, &mut context);
    tracing::info!("Fetching {} ({} requests)", start.href(), requests.len());

    let actions = join_all(requests.into_iter().map(|r| run_request(fetcher, r))).await;

    let mut failures = Vec::new();
    for action in actions {
        match action {
            Action::AddressLoaded { generation, result } => {
                if let Err(e) = &result {
                    failures.push(format!("address: {}", e));
                }
                page.apply_address(generation, result, &mut context);
            }
            Action::TransactionsLoaded { generation, result } => {
                if let Err(e) = &result {
                    failures.push(format!("transactions: {}", e));
                }
                page.apply_transactions(generation, result, &mut context);
            }
            other => tracing::debug!("Ignoring {:?} in dump mode", other),
        }
    }
    debug_assert!(!context.is_loading());
    Ok((page, failures))
}

/// Plain-text rendering of the page.
fn render_report(page: &AddressPage, network: Network) -> String {
    let summary = page.summary();
    let pagination = page.pagination();
    let symbol = network.token_symbol();
    let mut out = String::new();

    let _ = writeln!(out, "Address:      {}", page.address());
    let _ = writeln!(out, "Network:      {}", network);
    let _ = writeln!(out, "Balance:      {} {}", shannon_to_ckb(summary.balance), symbol);
    let _ = writeln!(out, "Transactions: {}", summary.transactions_count);
    let _ = writeln!(out, "Live cells:   {}", summary.cell_consumed);
    let _ = writeln!(out, "Lock script:");
    let script = lock_script_json(&summary.lock_script);
    for line in script.lines() {
        let _ = writeln!(out, "  {}", line);
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Page {} of {} ({} per page, {} total)",
        pagination.page_number,
        page.page_count(),
        pagination.page_size,
        page.total_transactions()
    );
    for tx in page.transactions() {
        let attrs = &tx.attributes;
        let _ = writeln!(
            out,
            "{}  {:>10}  {}  {} {}",
            tx.hash(),
            attrs.block_number,
            format_timestamp_ms(attrs.block_timestamp),
            signed_ckb(attrs.income_for(page.address())),
            symbol
        );
    }
    out
}
