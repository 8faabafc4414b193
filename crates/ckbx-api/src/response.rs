//! JSON:API response envelopes returned by the explorer.

use ckbx_core::{AddressSummary, TransactionWrapper, lenient_u64};
use serde::{Deserialize, Serialize};

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Total number of items across all pages.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub page_size: u64,
}

/// Top-level response body: `{ "data": ..., "meta": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Option<Meta>,
}

impl<T> Response<T> {
    /// Total item count, if the server sent pagination metadata.
    pub fn total(&self) -> Option<u64> {
        self.meta.map(|meta| meta.total)
    }
}

/// Address resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressWrapper {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub attributes: AddressSummary,
}

pub type AddressResponse = Response<AddressWrapper>;
pub type TransactionsResponse = Response<Vec<TransactionWrapper>>;

/// Error body sent with non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl ErrorBody {
    /// Best human-readable message in an error body, if any.
    pub(crate) fn parse_message(body: &str) -> Option<String> {
        let parsed: ErrorBody = match serde_json::from_str(body) {
            Ok(parsed) => parsed,
            Err(_) => {
                // Some endpoints answer with a bare array of error entries.
                let errors: Vec<ErrorEntry> = serde_json::from_str(body).ok()?;
                ErrorBody {
                    message: None,
                    errors,
                }
            }
        };

        parsed.message.filter(|m| !m.is_empty()).or_else(|| {
            parsed
                .errors
                .into_iter()
                .find_map(|e| e.detail.or(e.title).filter(|m| !m.is_empty()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ADDRESS_JSON: &str = r#"{
        "data": {
            "id": "3",
            "type": "address",
            "attributes": {
                "address_hash": "ckb1qyqt8xaupvm8837nv3gtc9x0ekkj64vud3jqfwyw5v",
                "balance": "62000000000",
                "transactions_count": "2",
                "cell_consumed": 1,
                "lock_script": {
                    "args": ["0x59a27ef3ba84f061517d13f42cf44ed020610061"],
                    "binary_hash": "0x9bd7e06f3ecf4be0f2fcd2188b23f1b9fcc88e5d4b65a8637b17723bbda3cce8"
                }
            }
        }
    }"#;

    const TRANSACTIONS_JSON: &str = r#"{
        "data": [
            {
                "id": "10",
                "type": "ckb_transactions",
                "attributes": {
                    "transaction_hash": "0xaaa",
                    "block_number": "120",
                    "block_timestamp": "1557382351000",
                    "transaction_fee": "0",
                    "display_inputs": [
                        { "id": 1, "from_cellbase": true, "capacity": "5000000000000.0", "address_hash": null }
                    ],
                    "display_outputs": [
                        { "id": 2, "capacity": "5000000000000.0", "address_hash": "ckb1me" }
                    ]
                }
            },
            {
                "id": "11",
                "type": "ckb_transactions",
                "attributes": { "transaction_hash": "0xbbb" }
            }
        ],
        "meta": { "total": 42, "page_size": 10 }
    }"#;

    #[test]
    fn test_decode_address_response() {
        let response: AddressResponse = serde_json::from_str(ADDRESS_JSON).unwrap();
        let attributes = response.data.attributes;
        assert_eq!(attributes.balance, 62_000_000_000);
        assert_eq!(attributes.transactions_count, 2);
        assert_eq!(attributes.cell_consumed, 1);
        assert_eq!(attributes.lock_script.args.len(), 1);
        assert_eq!(response.meta, None);
    }

    #[test]
    fn test_decode_transactions_response() {
        let response: TransactionsResponse = serde_json::from_str(TRANSACTIONS_JSON).unwrap();
        assert_eq!(response.total(), Some(42));
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].hash(), "0xaaa");
        assert_eq!(response.data[0].attributes.block_number, 120);
        assert_eq!(response.data[0].attributes.income_for("ckb1me"), 5_000_000_000_000);
        assert!(response.data[1].attributes.display_inputs.is_empty());
    }

    #[test]
    fn test_missing_meta_has_no_total() {
        let response: TransactionsResponse = serde_json::from_str(r#"{ "data": [] }"#).unwrap();
        assert_eq!(response.total(), None);
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let result: Result<AddressResponse, _> = serde_json::from_str(r#"{ "data": [] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_error_body_message() {
        assert_eq!(
            ErrorBody::parse_message(r#"{ "message": "Address Not Found" }"#).as_deref(),
            Some("Address Not Found")
        );
        assert_eq!(
            ErrorBody::parse_message(
                r#"{ "message": "", "errors": [{ "title": "Not Found", "detail": "No address found by given address hash" }] }"#
            )
            .as_deref(),
            Some("No address found by given address hash")
        );
        assert_eq!(
            ErrorBody::parse_message(r#"[{ "title": "URL Not Found" }]"#).as_deref(),
            Some("URL Not Found")
        );
        assert_eq!(ErrorBody::parse_message("<html>bad gateway</html>"), None);
    }
}
