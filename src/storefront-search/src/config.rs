//! Configuration types for the suggestion widget.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{DEBOUNCE_MS, MAX_RENDERED, MIN_QUERY_CHARS};

/// Configuration for the suggestion widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Minimum trailing-word length (in characters) before a lookup is made.
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Quiet period after the last keystroke, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum number of entries rendered in the list.
    #[serde(default = "default_max_rendered")]
    pub max_rendered: usize,
}

fn default_min_query_chars() -> usize {
    MIN_QUERY_CHARS
}

fn default_debounce_ms() -> u64 {
    DEBOUNCE_MS
}

fn default_max_rendered() -> usize {
    MAX_RENDERED
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            min_query_chars: default_min_query_chars(),
            debounce_ms: default_debounce_ms(),
            max_rendered: default_max_rendered(),
        }
    }
}

impl SuggestConfig {
    /// Creates a builder for constructing a configuration.
    pub fn builder() -> SuggestConfigBuilder {
        SuggestConfigBuilder::default()
    }

    /// Debounce quiet period as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Checks whether a trailing word is long enough to look up.
    pub fn qualifies(&self, word: &str) -> bool {
        word.chars().count() >= self.min_query_chars
    }
}

/// Builder for creating `SuggestConfig` instances.
#[derive(Debug, Default)]
pub struct SuggestConfigBuilder {
    config: SuggestConfig,
}

impl SuggestConfigBuilder {
    /// Sets the minimum trailing-word length.
    pub fn min_query_chars(mut self, chars: usize) -> Self {
        self.config.min_query_chars = chars;
        self
    }

    /// Sets the debounce quiet period.
    pub fn debounce(mut self, delay: Duration) -> Self {
        self.config.debounce_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the maximum number of rendered entries.
    pub fn max_rendered(mut self, max: usize) -> Self {
        self.config.max_rendered = max;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> SuggestConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SuggestConfig::default();
        assert_eq!(config.min_query_chars, 2);
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.max_rendered, 8);
    }

    #[test]
    fn test_config_builder() {
        let config = SuggestConfig::builder()
            .min_query_chars(3)
            .debounce(Duration::from_millis(100))
            .max_rendered(5)
            .build();

        assert_eq!(config.min_query_chars, 3);
        assert_eq!(config.debounce_ms, 100);
        assert_eq!(config.max_rendered, 5);
    }

    #[test]
    fn test_qualifies_counts_chars() {
        let config = SuggestConfig::default();
        assert!(!config.qualifies(""));
        assert!(!config.qualifies("a"));
        assert!(config.qualifies("ap"));
        // Two characters, four bytes.
        assert!(config.qualifies("éé"));
        assert!(!config.qualifies("é"));
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: SuggestConfig = serde_json::from_str(r#"{"debounce_ms": 400}"#).unwrap();
        assert_eq!(config.debounce_ms, 400);
        assert_eq!(config.min_query_chars, 2);
        assert_eq!(config.max_rendered, 8);
    }
}
