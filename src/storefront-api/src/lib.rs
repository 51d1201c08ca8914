//! Storefront API client
//!
//! This crate talks to the storefront REST API. The search box only needs
//! the autocomplete endpoint; [`StorefrontClient`] also implements
//! [`storefront_search::CandidateProvider`] so it can back the suggestion
//! widget directly.

mod client;
mod config;

pub use client::StorefrontClient;
pub use config::ApiConfig;

/// Default storefront API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Error types for storefront API operations
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Storefront API at {0} is not responding")]
    Connection(String),

    #[error("Server returned error: {0}")]
    Server(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

/// Result type for storefront API operations
pub type Result<T> = std::result::Result<T, ApiError>;
