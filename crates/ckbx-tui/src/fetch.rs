//! Fetch task: executes page fetch requests concurrently and reports results
//! back to the UI as actions.

use std::sync::Arc;

use ckbx_api::Fetcher;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::action::{Action, FetchRequest, TransactionPage};

/// Execute one request. Failures are turned into error results; this never fails.
pub async fn run_request(fetcher: &dyn Fetcher, request: FetchRequest) -> Action {
    match request {
        FetchRequest::AddressInfo {
            generation,
            address,
        } => {
            let result = fetcher
                .fetch_address_info(&address)
                .await
                .map(|response| response.data.attributes)
                .map_err(|e| {
                    tracing::debug!("Address fetch for {} failed: {}", address, e);
                    if e.is_not_found() {
                        format!("Address {} is not known to the explorer", address)
                    } else {
                        e.to_string()
                    }
                });
            Action::AddressLoaded { generation, result }
        }
        FetchRequest::Transactions {
            generation,
            address,
            pagination,
        } => {
            let result = fetcher
                .fetch_transactions_by_address(
                    &address,
                    pagination.page_number,
                    pagination.page_size,
                )
                .await
                .map(|response| TransactionPage {
                    total: response.total(),
                    transactions: response.data,
                })
                .map_err(|e| {
                    tracing::debug!("Transactions fetch for {} failed: {}", address, e);
                    e.to_string()
                });
            Action::TransactionsLoaded { generation, result }
        }
    }
}

/// Receive requests until cancelled, running each one on its own task.
pub async fn fetch_task(
    fetcher: Arc<dyn Fetcher>,
    mut request_rx: mpsc::Receiver<FetchRequest>,
    action_tx: mpsc::Sender<Action>,
    cancel: CancellationToken,
) {
    loop {
        let request = tokio::select! {
            _ = cancel.cancelled() => break,
            request = request_rx.recv() => match request {
                Some(request) => request,
                None => break,
            },
        };

        let fetcher = fetcher.clone();
        let action_tx = action_tx.clone();
        tokio::spawn(async move {
            let action = run_request(fetcher.as_ref(), request).await;
            if action_tx.send(action).await.is_err() {
                tracing::debug!("UI closed before fetch result was delivered");
            }
        });
    }
    tracing::debug!("Fetch task stopped");
}
