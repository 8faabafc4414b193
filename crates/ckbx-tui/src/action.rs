//! Actions for state updates and requests for the fetch task.

use ckbx_core::{AddressSummary, PaginationState, TransactionWrapper};

/// A successfully fetched page of transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPage {
    pub transactions: Vec<TransactionWrapper>,
    /// Total from the pagination metadata, when the server sent it.
    pub total: Option<u64>,
}

/// Work for the fetch task. Each request carries the generation of the
/// navigation cycle that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    AddressInfo {
        generation: u64,
        address: String,
    },
    Transactions {
        generation: u64,
        address: String,
        pagination: PaginationState,
    },
}

impl FetchRequest {
    pub fn generation(&self) -> u64 {
        match self {
            FetchRequest::AddressInfo { generation, .. } => *generation,
            FetchRequest::Transactions { generation, .. } => *generation,
        }
    }
}

/// Actions that can update application state.
#[derive(Debug, Clone)]
pub enum Action {
    /// Push a new location (`/address/<hash>?page=..&size=..`).
    Navigate(String),
    /// Go back in history.
    Back,
    /// Go forward in history.
    Forward,
    /// User picked a new page/size in the pagination bar.
    ChangePagination { page: u32, size: u32 },
    /// Address fetch settled.
    AddressLoaded {
        generation: u64,
        result: Result<AddressSummary, String>,
    },
    /// Transaction page fetch settled.
    TransactionsLoaded {
        generation: u64,
        result: Result<TransactionPage, String>,
    },
    /// Copy the current address to the clipboard.
    CopyAddress,
    /// Quit the application.
    Quit,
}
