//! Application configuration.
//!
//! The persisted file lives in ckbx-core; this module merges it with the
//! command line into the settings the binary runs with.

use std::time::Duration;

use ckbx_api::ClientConfig;
use ckbx_core::{AppConfig, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, Network, PaginationState, ThemeConfig};

use crate::location::Location;

pub use ckbx_core::config::{load_config, save_config};

/// Values given on the command line. `None` means "use the config file".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub address: Option<String>,
    pub path: Option<String>,
    pub network: Option<Network>,
    pub api_url: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub toast_errors: bool,
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub network: Network,
    pub api_url: Option<String>,
    pub timeout: Duration,
    pub toast_fetch_errors: bool,
    pub theme: ThemeConfig,
    /// First location shown.
    pub start: Location,
}

impl Settings {
    pub fn resolve(config: &AppConfig, overrides: &Overrides) -> Self {
        let network = overrides.network.unwrap_or(config.network);
        // A custom URL from the file belongs to the file's network.
        let api_url = overrides
            .api_url
            .clone()
            .or_else(|| (network == config.network).then(|| config.api_url.clone()).flatten());

        Self {
            network,
            api_url,
            timeout: Duration::from_secs(overrides.timeout_secs.unwrap_or(config.request_timeout_secs).max(1)),
            toast_fetch_errors: overrides.toast_errors || config.toast_fetch_errors,
            theme: config.theme,
            start: start_location(config, overrides, network),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            network: self.network,
            api_url: self.api_url.clone(),
            timeout: self.timeout,
        }
    }
}

/// `--path` wins, then an explicit address, then the last address viewed on
/// this network, then the home page.
fn start_location(config: &AppConfig, overrides: &Overrides, network: Network) -> Location {
    if let Some(path) = &overrides.path {
        return Location::parse(path);
    }

    let address = overrides
        .address
        .clone()
        .or_else(|| config.recent_for(network).first().map(|r| r.address.clone()));
    let Some(address) = address else {
        return Location::parse("/");
    };

    let pagination = if overrides.page.is_some() || overrides.size.is_some() {
        Some(PaginationState::new(
            overrides.page.unwrap_or(DEFAULT_PAGE),
            overrides.size.unwrap_or(config.page_size),
        ))
    } else if config.page_size != DEFAULT_PAGE_SIZE {
        Some(PaginationState::new(DEFAULT_PAGE, config.page_size))
    } else {
        None
    };
    Location::address(&address, pagination)
}
