//! In-app navigation: locations, routes and a browser-style history.

use ckbx_core::{PageParams, PaginationState};

/// A navigable location: path plus search string (`?page=2&size=5` or empty).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    pub search: String,
}

impl Location {
    /// Parse an href such as `/address/ckb1...?page=2#top`. The fragment is dropped.
    pub fn parse(href: &str) -> Self {
        let href = href.split('#').next().unwrap_or_default().trim();
        let (path, search) = match href.find('?') {
            Some(idx) => (&href[..idx], &href[idx..]),
            None => (href, ""),
        };
        let path = if path.is_empty() {
            "/".to_string()
        } else if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        // A bare `?` carries no parameters.
        let search = if search == "?" { "" } else { search };
        Self {
            path,
            search: search.to_string(),
        }
    }

    /// Location of an address page, optionally with explicit pagination.
    pub fn address(address: &str, pagination: Option<PaginationState>) -> Self {
        Self {
            path: format!("/address/{}", address),
            search: pagination
                .map(|p| format!("?{}", PageParams::to_query(p)))
                .unwrap_or_default(),
        }
    }

    pub fn href(&self) -> String {
        format!("{}{}", self.path, self.search)
    }
}

/// Pages the application knows how to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Address(String),
    NotFound,
}

impl Route {
    pub fn resolve(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Route::Home;
        }
        match trimmed.strip_prefix("/address/") {
            Some(address) if !address.is_empty() && !address.contains('/') => {
                Route::Address(address.to_string())
            }
            _ => Route::NotFound,
        }
    }
}

/// Browser-style history stack.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Location>,
    index: usize,
}

impl History {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    pub fn current(&self) -> &Location {
        &self.entries[self.index]
    }

    /// Push a new entry, discarding anything ahead of the current one.
    pub fn push(&mut self, location: Location) {
        tracing::debug!("Navigate to {}", location.href());
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index = self.entries.len() - 1;
    }

    /// Go back one entry. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Go forward one entry. Returns false at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_location() {
        assert_eq!(
            Location::parse("/address/abc?page=2&size=5"),
            Location {
                path: "/address/abc".into(),
                search: "?page=2&size=5".into(),
            }
        );
        assert_eq!(Location::parse("/address/abc").search, "");
        assert_eq!(Location::parse("").path, "/");
        assert_eq!(Location::parse("address/abc").path, "/address/abc");
        assert_eq!(Location::parse("/address/abc?").search, "");
        assert_eq!(Location::parse("/address/abc?page=3#tx").search, "?page=3");
    }

    #[test]
    fn test_address_location() {
        let loc = Location::address("X", Some(PaginationState::new(3, 20)));
        assert_eq!(loc.href(), "/address/X?page=3&size=20");
        assert_eq!(Location::address("X", None).href(), "/address/X");
    }

    #[test]
    fn test_route_resolve() {
        assert_eq!(Route::resolve("/"), Route::Home);
        assert_eq!(Route::resolve(""), Route::Home);
        assert_eq!(
            Route::resolve("/address/ckb1abc"),
            Route::Address("ckb1abc".into())
        );
        assert_eq!(
            Route::resolve("/address/ckb1abc/"),
            Route::Address("ckb1abc".into())
        );
        assert_eq!(Route::resolve("/address/"), Route::NotFound);
        assert_eq!(Route::resolve("/address/a/b"), Route::NotFound);
        assert_eq!(Route::resolve("/block/12"), Route::NotFound);
    }

    #[test]
    fn test_history_push_back_forward() {
        let mut history = History::new(Location::parse("/address/a"));
        history.push(Location::parse("/address/a?page=2&size=10"));
        history.push(Location::parse("/address/b"));
        assert_eq!(history.entries.len(), 3);
        assert!(!history.can_go_forward());

        assert!(history.back());
        assert_eq!(history.current().href(), "/address/a?page=2&size=10");
        assert!(history.forward());
        assert_eq!(history.current().href(), "/address/b");
        assert!(!history.forward());

        assert!(history.back());
        assert!(history.back());
        assert!(!history.back());
        assert!(!history.can_go_back());
    }

    #[test]
    fn test_push_discards_forward_entries() {
        let mut history = History::new(Location::parse("/address/a"));
        history.push(Location::parse("/address/b"));
        history.back();
        history.push(Location::parse("/address/c"));
        assert_eq!(history.entries.len(), 2);
        assert!(!history.forward());
        assert_eq!(history.current().path, "/address/c");
    }
}
