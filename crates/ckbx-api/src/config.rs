//! Explorer API endpoint configuration.

use std::time::Duration;

use ckbx_core::Network;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Get the public explorer API base URL for a network.
pub fn get_api_base_url(network: Network) -> &'static str {
    match network {
        Network::Mainnet => "https://mainnet-api.explorer.nervos.org/api/v1",
        Network::Testnet => "https://testnet-api.explorer.nervos.org/api/v1",
    }
}

/// Settings used to build an [`ExplorerClient`](crate::ExplorerClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub network: Network,
    /// Custom API base URL; the network default is used when `None`.
    pub api_url: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            api_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or_else(|| get_api_base_url(self.network))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_urls() {
        assert!(get_api_base_url(Network::Mainnet).starts_with("https://mainnet-api"));
        assert!(get_api_base_url(Network::Testnet).starts_with("https://testnet-api"));
    }

    #[test]
    fn test_custom_url_overrides_network() {
        let mut config = ClientConfig::new(Network::Testnet);
        assert_eq!(config.base_url(), get_api_base_url(Network::Testnet));
        config.api_url = Some("http://localhost:3000/api/v1".into());
        assert_eq!(config.base_url(), "http://localhost:3000/api/v1");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }
}
