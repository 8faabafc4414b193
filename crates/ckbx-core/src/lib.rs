//! Core domain logic for the CKB address explorer.
//!
//! This crate provides:
//! - Core domain types (`types` module)
//! - Pagination query parameters (`query` module)
//! - Display formatting (`display` module)
//!
//! With the `persistence` feature enabled:
//! - Configuration management (`config` module)

pub mod display;
pub mod query;
pub mod types;

#[cfg(feature = "persistence")]
pub mod config;

pub use display::*;
pub use query::*;
pub use types::*;

#[cfg(feature = "persistence")]
pub use config::{AppConfig, ConfigError, RecentAddress, ThemeConfig};
