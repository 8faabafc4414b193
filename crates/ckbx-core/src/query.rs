//! Pagination query parameters (`?page=<n>&size=<n>`).

use url::form_urlencoded;

use crate::types::PaginationState;

/// Page shown when `page` is absent or invalid.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when `size` is absent or invalid.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Page sizes offered by the size changer.
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

/// Parse `raw` as a positive integer, falling back to `default`.
///
/// Zero, negative, non-numeric, and overflowing values all yield `default`.
pub fn valid_number(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|&value| value > 0)
        .unwrap_or(default)
}

/// Reads and writes the `page`/`size` pair of a location's search string.
pub struct PageParams;

impl PageParams {
    /// Derive validated pagination from a search string (leading `?` optional).
    pub fn from_query(search: &str) -> PaginationState {
        let query = search.strip_prefix('?').unwrap_or(search);

        let mut page = None;
        let mut size = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" if page.is_none() => page = Some(value.into_owned()),
                "size" if size.is_none() => size = Some(value.into_owned()),
                _ => {}
            }
        }

        PaginationState {
            page_number: valid_number(page.as_deref(), DEFAULT_PAGE),
            page_size: valid_number(size.as_deref(), DEFAULT_PAGE_SIZE),
        }
    }

    /// Encode pagination as `page=<p>&size=<s>`.
    pub fn to_query(state: PaginationState) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("page", &state.page_number.to_string())
            .append_pair("size", &state.page_size.to_string())
            .finish()
    }
}

/// Next (`forward`) or previous page size in [`PAGE_SIZE_OPTIONS`].
///
/// A size that is not one of the options snaps to the nearest larger option
/// when moving forward and the nearest smaller one when moving back.
pub fn cycle_page_size(current: u32, forward: bool) -> u32 {
    if forward {
        PAGE_SIZE_OPTIONS
            .iter()
            .copied()
            .find(|&size| size > current)
            .unwrap_or(PAGE_SIZE_OPTIONS[PAGE_SIZE_OPTIONS.len() - 1])
    } else {
        PAGE_SIZE_OPTIONS
            .iter()
            .rev()
            .copied()
            .find(|&size| size < current)
            .unwrap_or(PAGE_SIZE_OPTIONS[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_valid_number() {
        assert_eq!(valid_number(Some("3"), 1), 3);
        assert_eq!(valid_number(Some(" 7 "), 1), 7);
        assert_eq!(valid_number(Some("0"), 1), 1);
        assert_eq!(valid_number(Some("-5"), 1), 1);
        assert_eq!(valid_number(Some("abc"), 10), 10);
        assert_eq!(valid_number(Some("2.5"), 10), 10);
        assert_eq!(valid_number(Some(""), 10), 10);
        assert_eq!(valid_number(Some("99999999999"), 10), 10);
        assert_eq!(valid_number(None, 10), 10);
    }

    #[test]
    fn test_from_query_defaults() {
        let defaults = PaginationState::new(1, 10);
        assert_eq!(PageParams::from_query(""), defaults);
        assert_eq!(PageParams::from_query("?"), defaults);
        assert_eq!(PageParams::from_query("?page=0"), defaults);
        assert_eq!(PageParams::from_query("?page=-5&size=0"), defaults);
        assert_eq!(PageParams::from_query("page=abc&size=xyz"), defaults);
        assert_eq!(PageParams::from_query("?foo=bar"), defaults);
    }

    #[test]
    fn test_from_query_values() {
        assert_eq!(
            PageParams::from_query("?page=2&size=5"),
            PaginationState::new(2, 5)
        );
        assert_eq!(
            PageParams::from_query("size=20&page=3"),
            PaginationState::new(3, 20)
        );
        // Missing size keeps the default for that field only.
        assert_eq!(PageParams::from_query("?page=4"), PaginationState::new(4, 10));
    }

    #[test]
    fn test_from_query_first_occurrence_wins() {
        assert_eq!(
            PageParams::from_query("?page=2&page=9&size=5&size=1"),
            PaginationState::new(2, 5)
        );
    }

    #[test]
    fn test_from_query_percent_decoded() {
        assert_eq!(
            PageParams::from_query("?page=%32&size=%31%30"),
            PaginationState::new(2, 10)
        );
    }

    #[test]
    fn test_to_query() {
        assert_eq!(
            PageParams::to_query(PaginationState::new(3, 20)),
            "page=3&size=20"
        );
    }

    #[test]
    fn test_cycle_page_size() {
        assert_eq!(cycle_page_size(10, true), 20);
        assert_eq!(cycle_page_size(20, true), 50);
        assert_eq!(cycle_page_size(100, true), 100);
        assert_eq!(cycle_page_size(50, false), 20);
        assert_eq!(cycle_page_size(10, false), 10);
        assert_eq!(cycle_page_size(5, true), 10);
        assert_eq!(cycle_page_size(30, false), 20);
    }
}
