//! CLI configuration file.
//!
//! ```toml
//! [api]
//! base_url = "https://shop.example/api"
//! api_key = "..."
//! timeout_secs = 10
//!
//! [suggest]
//! min_query_chars = 2
//! debounce_ms = 250
//! max_rendered = 8
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storefront_api::ApiConfig;
use storefront_search::SuggestConfig;

/// Environment variable overriding `api.base_url`.
pub const ENV_API_URL: &str = "STOREFRONT_API_URL";

/// Environment variable overriding `api.api_key`.
pub const ENV_API_KEY: &str = "STOREFRONT_API_KEY";

/// Top-level CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Storefront API connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Suggestion widget tuning.
    #[serde(default)]
    pub suggest: SuggestConfig,
}

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Default config location: `<config_dir>/storefront/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("storefront").join("config.toml"))
    }

    /// Load `explicit` if given, else the default file if it exists, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("Loading config from {}", path.display());
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Apply overrides from `lookup` (an environment-like key/value source).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api.base_url = url;
        }

        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.is_empty()) {
            self.api.api_key = Some(key);
        }
    }
}
