//! Error types for suggestion lookups.

/// Result type alias for suggestion operations.
pub type SuggestResult<T> = std::result::Result<T, SuggestError>;

/// Errors that can occur while looking up suggestions.
///
/// None of these are fatal to the widget: a failed lookup only closes the
/// suggestion list.
#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    /// The candidate provider failed (network or parse failure).
    #[error("Suggestion lookup failed: {0}")]
    Lookup(String),
}

impl SuggestError {
    /// Creates a new `Lookup` error.
    pub fn lookup(reason: impl Into<String>) -> Self {
        Self::Lookup(reason.into())
    }
}
