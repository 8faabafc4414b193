//! Core domain types for the address page.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Balance in shannons (1 CKB = 10^8 shannons).
pub type Shannons = u64;

/// Number of shannons in one CKB.
pub const SHANNONS_PER_CKB: u64 = 100_000_000;

/// Supported networks - exhaustive match required (no default case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    pub fn token_symbol(&self) -> &'static str {
        match self {
            Network::Mainnet => "CKB",
            Network::Testnet => "CKB",
        }
    }

    /// Human-readable prefix of addresses on this network.
    pub fn address_prefix(&self) -> &'static str {
        match self {
            Network::Mainnet => "ckb",
            Network::Testnet => "ckt",
        }
    }

    /// Returns all known networks.
    pub fn all() -> &'static [Network] {
        &[Network::Mainnet, Network::Testnet]
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Mainnet => write!(f, "Mainnet"),
            Network::Testnet => write!(f, "Testnet"),
        }
    }
}

/// Lock script guarding an address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LockScript {
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub binary_hash: String,
}

/// Summary of an address as shown at the top of the page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddressSummary {
    #[serde(default)]
    pub address_hash: String,
    /// Balance in shannons.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub balance: Shannons,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub transactions_count: u64,
    /// Number of live cells owned by the address.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub cell_consumed: u64,
    #[serde(default)]
    pub lock_script: LockScript,
}

/// One input or output cell as listed on a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellDisplay {
    /// `None` for cellbase inputs, which have no owner.
    #[serde(default)]
    pub address_hash: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub capacity: Shannons,
    #[serde(default)]
    pub from_cellbase: bool,
}

/// Transaction attributes rendered in the address transaction list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub transaction_hash: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub block_number: u64,
    /// Block timestamp in milliseconds since the Unix epoch.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub block_timestamp: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub transaction_fee: Shannons,
    #[serde(default)]
    pub display_inputs: Vec<CellDisplay>,
    #[serde(default)]
    pub display_outputs: Vec<CellDisplay>,
}

impl TransactionSummary {
    /// Net capacity change for `address`: outputs paid to it minus inputs spent from it.
    pub fn income_for(&self, address: &str) -> i128 {
        let received: i128 = self
            .display_outputs
            .iter()
            .filter(|cell| cell.address_hash.as_deref() == Some(address))
            .map(|cell| cell.capacity as i128)
            .sum();
        let spent: i128 = self
            .display_inputs
            .iter()
            .filter(|cell| cell.address_hash.as_deref() == Some(address))
            .map(|cell| cell.capacity as i128)
            .sum();
        received - spent
    }
}

/// JSON:API resource wrapping a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionWrapper {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub attributes: TransactionSummary,
}

impl TransactionWrapper {
    /// Stable identity of the list item.
    pub fn hash(&self) -> &str {
        &self.attributes.transaction_hash
    }
}

/// Validated pagination of the transaction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaginationState {
    /// 1-based page number.
    pub page_number: u32,
    pub page_size: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_number: crate::query::DEFAULT_PAGE,
            page_size: crate::query::DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationState {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: page_number.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Number of pages needed for `total` items (at least one).
    pub fn page_count(&self, total: u64) -> u32 {
        let pages = total.div_ceil(self.page_size as u64).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

/// Deserialize a non-negative integer sent either as a JSON number or as a
/// decimal string (`"12"`, `"12.0"`). `null` maps to zero.
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Float(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Raw::Int(v)) => Ok(v),
        Some(Raw::Float(v)) if v.is_finite() && v >= 0.0 => Ok(v as u64),
        Some(Raw::Float(v)) => Err(de::Error::custom(format!("invalid amount: {}", v))),
        Some(Raw::Text(s)) => {
            let s = s.trim();
            if let Ok(v) = s.parse::<u64>() {
                return Ok(v);
            }
            match s.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => Ok(v as u64),
                _ => Err(de::Error::custom(format!("invalid amount: {:?}", s))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_network_prefixes() {
        assert_eq!(Network::Mainnet.address_prefix(), "ckb");
        assert_eq!(Network::Testnet.address_prefix(), "ckt");
        assert_eq!(Network::Mainnet.token_symbol(), "CKB");
    }

    #[test]
    fn test_network_display() {
        assert_eq!(format!("{}", Network::Mainnet), "Mainnet");
        assert_eq!(format!("{}", Network::Testnet), "Testnet");
        assert_eq!(Network::all().len(), 2);
    }

    #[test]
    fn test_address_summary_default_is_empty() {
        let summary = AddressSummary::default();
        assert_eq!(summary.address_hash, "");
        assert_eq!(summary.balance, 0);
        assert_eq!(summary.transactions_count, 0);
        assert_eq!(summary.cell_consumed, 0);
        assert!(summary.lock_script.args.is_empty());
        assert_eq!(summary.lock_script.binary_hash, "");
    }

    #[test]
    fn test_address_summary_accepts_string_numbers() {
        let json = r#"{
            "address_hash": "ckb1qyqabc",
            "balance": "150000000000",
            "transactions_count": 12,
            "cell_consumed": "3.0",
            "lock_script": { "args": ["0x01"], "binary_hash": "0x9bd7" }
        }"#;
        let summary: AddressSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.balance, 150_000_000_000);
        assert_eq!(summary.transactions_count, 12);
        assert_eq!(summary.cell_consumed, 3);
        assert_eq!(summary.lock_script.args, vec!["0x01".to_string()]);
    }

    #[test]
    fn test_null_amount_is_zero() {
        let summary: AddressSummary =
            serde_json::from_str(r#"{ "address_hash": "x", "balance": null }"#).unwrap();
        assert_eq!(summary.balance, 0);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result: Result<AddressSummary, _> =
            serde_json::from_str(r#"{ "balance": "-4" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_transaction_requires_hash() {
        let result: Result<TransactionWrapper, _> =
            serde_json::from_str(r#"{ "id": "1", "type": "ckb_transactions", "attributes": {} }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_income_for_address() {
        let tx = TransactionSummary {
            transaction_hash: "0xaa".into(),
            block_number: 1,
            block_timestamp: 0,
            transaction_fee: 0,
            display_inputs: vec![CellDisplay {
                address_hash: Some("me".into()),
                capacity: 500,
                from_cellbase: false,
            }],
            display_outputs: vec![
                CellDisplay {
                    address_hash: Some("other".into()),
                    capacity: 300,
                    from_cellbase: false,
                },
                CellDisplay {
                    address_hash: Some("me".into()),
                    capacity: 190,
                    from_cellbase: false,
                },
            ],
        };
        assert_eq!(tx.income_for("me"), -310);
        assert_eq!(tx.income_for("other"), 300);
        assert_eq!(tx.income_for("nobody"), 0);
    }

    #[test]
    fn test_page_count() {
        let state = PaginationState::new(1, 10);
        assert_eq!(state.page_count(0), 1);
        assert_eq!(state.page_count(10), 1);
        assert_eq!(state.page_count(11), 2);
        assert_eq!(PaginationState::new(0, 0), PaginationState::new(1, 1));
    }
}
