//! Formatting helpers shared by the terminal page and dump mode.

use chrono::{DateTime, Utc};

use crate::types::{SHANNONS_PER_CKB, Shannons};

/// Group the digits of an integer with commas.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Convert shannons to a CKB amount string, e.g. `1,234.5`.
///
/// Trailing zero decimals are dropped; at most 8 decimals are shown.
pub fn shannon_to_ckb(shannons: Shannons) -> String {
    let whole = shannons / SHANNONS_PER_CKB;
    let frac = shannons % SHANNONS_PER_CKB;
    let whole = group_thousands(&whole.to_string());
    if frac == 0 {
        return whole;
    }
    let frac = format!("{:08}", frac);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Signed CKB amount for income columns (`+12.5`, `-3`, `0`).
pub fn signed_ckb(shannons: i128) -> String {
    let magnitude = shannon_to_ckb(u64::try_from(shannons.unsigned_abs()).unwrap_or(u64::MAX));
    match shannons.signum() {
        1 => format!("+{}", magnitude),
        -1 => format!("-{}", magnitude),
        _ => magnitude,
    }
}

/// Shorten a hash or address to `prefix...suffix` when it is longer than both.
pub fn truncate_middle(value: &str, prefix_len: usize, suffix_len: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= prefix_len + suffix_len + 3 {
        return value.to_string();
    }
    let head: String = chars[..prefix_len].iter().collect();
    let tail: String = chars[chars.len() - suffix_len..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Render a block timestamp (milliseconds) as `YYYY-MM-DD HH:MM:SS` UTC.
pub fn format_timestamp_ms(timestamp_ms: u64) -> String {
    i64::try_from(timestamp_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}
