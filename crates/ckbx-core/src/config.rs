//! Application configuration and persistence utilities.
//!
//! The configuration is a single JSON file in the platform config directory.
//! Every field has a default so that older or hand-edited files still load.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::query::DEFAULT_PAGE_SIZE;
use crate::types::Network;

/// Maximum number of entries kept in the recent address list.
const MAX_RECENT_ADDRESSES: usize = 20;

/// Configuration error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Other configuration error.
    #[error("{0}")]
    Other(String),
}

/// Theme configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeConfig {
    /// Follow terminal background.
    #[default]
    System,
    /// Force light theme.
    Light,
    /// Force dark theme.
    Dark,
}

impl ThemeConfig {
    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            ThemeConfig::System => "System",
            ThemeConfig::Light => "Light",
            ThemeConfig::Dark => "Dark",
        }
    }
}

/// An address the user has viewed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecentAddress {
    pub address: String,
    #[serde(default)]
    pub network: Network,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub network: Network,
    /// Explorer API base URL overriding the network default.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Page size used for addresses opened without a `size` parameter.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub theme: ThemeConfig,
    /// Surface failed fetches as toasts instead of only logging them.
    #[serde(default)]
    pub toast_fetch_errors: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Most recent first.
    #[serde(default)]
    pub recent_addresses: Vec<RecentAddress>,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            api_url: None,
            page_size: default_page_size(),
            theme: ThemeConfig::default(),
            toast_fetch_errors: false,
            request_timeout_secs: default_request_timeout_secs(),
            recent_addresses: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Record a viewed address, moving it to the front of the recent list.
    pub fn remember_address(&mut self, address: &str, network: Network) {
        self.recent_addresses
            .retain(|r| !(r.address == address && r.network == network));
        self.recent_addresses.insert(
            0,
            RecentAddress {
                address: address.to_string(),
                network,
            },
        );
        self.recent_addresses.truncate(MAX_RECENT_ADDRESSES);
    }

    /// Recent addresses for one network, most recent first.
    pub fn recent_for(&self, network: Network) -> Vec<&RecentAddress> {
        self.recent_addresses
            .iter()
            .filter(|r| r.network == network)
            .collect()
    }
}

// ==================== Path Utilities ====================

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("org", "nervos", "ckbx")
        .ok_or_else(|| ConfigError::Other("Could not determine config directory".to_string()))
}

/// Get the config directory.
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the config file path.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    get_config_dir().map(|dir| dir.join("config.json"))
}

// ==================== Config I/O ====================

/// Load configuration from disk, or defaults when no file exists yet.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_config_path()?)
}

/// Save configuration to disk.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
