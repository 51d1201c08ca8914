//! Storefront API client implementation

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use storefront_search::{CandidateProvider, SuggestError, SuggestResult};

use crate::config::ApiConfig;
use crate::{ApiError, Result};

/// Client for the storefront REST API
#[derive(Clone)]
pub struct StorefrontClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl StorefrontClient {
    /// Create a new client from `config`
    ///
    /// Fails if the base URL is not an absolute http(s) URL.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let parsed = url::Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                config.base_url,
                parsed.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Fetch autocomplete candidates for `query`
    ///
    /// Returns the decoded JSON body unchanged; callers decide what a
    /// non-array payload means.
    pub async fn get_autocomplete(&self, query: &str) -> Result<Value> {
        let url = self.endpoint("autocomplete");
        let mut request = self.client.get(&url).query(&[("query", query)]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key.as_str())]);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                ApiError::Connection(self.base_url.clone())
            } else {
                ApiError::Request(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Server(format!(
                "Autocomplete failed: {} - {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let payload = serde_json::from_str(&body)?;
        tracing::trace!(query, "autocomplete response received");
        Ok(payload)
    }
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl CandidateProvider for StorefrontClient {
    async fn autocomplete(&self, query: &str) -> SuggestResult<Value> {
        self.get_autocomplete(query)
            .await
            .map_err(|e| SuggestError::lookup(e.to_string()))
    }
}
