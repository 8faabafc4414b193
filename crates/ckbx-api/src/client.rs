//! HTTP client for the CKB explorer API.
//!
//! The explorer speaks JSON:API; every request carries the
//! `application/vnd.api+json` media type in both `Accept` and `Content-Type`.

use async_trait::async_trait;
use ckbx_core::Network;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::response::{AddressResponse, ErrorBody, TransactionsResponse};

/// JSON:API media type.
pub const JSON_API: &str = "application/vnd.api+json";

/// Data-fetch gateway used by the address page.
///
/// Both operations are independent; either may fail without affecting the other.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the summary of an address.
    async fn fetch_address_info(&self, address: &str) -> Result<AddressResponse, ApiError>;

    /// Fetch one page of transactions touching an address.
    async fn fetch_transactions_by_address(
        &self,
        address: &str,
        page: u32,
        page_size: u32,
    ) -> Result<TransactionsResponse, ApiError>;
}

/// Explorer API client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    http: reqwest::Client,
    base_url: Url,
    network: Network,
}

impl ExplorerClient {
    /// Build a client for the configured network and base URL.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(config.base_url())
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url(), e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_API));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_API));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        tracing::info!("Explorer API for {}: {}", config.network, base_url);

        Ok(Self {
            http,
            base_url,
            network: config.network,
        })
    }

    /// Get the configured network.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Get the API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, escaping each segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let start = std::time::Instant::now();
        tracing::debug!("GET {}", url);

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            let message = ErrorBody::parse_message(&text).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            tracing::debug!("GET {} failed with {}: {}", url, status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let value = serde_json::from_slice(&body)?;
        tracing::debug!(
            "GET {} ({} bytes) in {:?}",
            url,
            body.len(),
            start.elapsed()
        );
        Ok(value)
    }
}

#[async_trait]
impl Fetcher for ExplorerClient {
    async fn fetch_address_info(&self, address: &str) -> Result<AddressResponse, ApiError> {
        let url = self.endpoint(&["addresses", address])?;
        self.get_json(url).await
    }

    async fn fetch_transactions_by_address(
        &self,
        address: &str,
        page: u32,
        page_size: u32,
    ) -> Result<TransactionsResponse, ApiError> {
        let mut url = self.endpoint(&["address_transactions", address])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("page_size", &page_size.to_string());
        self.get_json(url).await
    }
}
