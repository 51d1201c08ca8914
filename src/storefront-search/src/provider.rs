//! Candidate provider interface.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SuggestResult;

/// Source of autocomplete candidates, usually the remote storefront API.
///
/// The provider returns the raw decoded payload; the widget coerces it with
/// [`coerce_candidates`]. Requests cannot be cancelled once issued.
#[async_trait]
pub trait CandidateProvider: Send + Sync {
    /// Look up candidates for `query`.
    async fn autocomplete(&self, query: &str) -> SuggestResult<Value>;
}

/// Turn a provider payload into a candidate sequence.
///
/// Anything that is not a JSON array counts as "no suggestions". Array
/// elements that are strings are kept verbatim, numbers and booleans are
/// kept as their text form, and null/object/array elements are skipped.
pub fn coerce_candidates(payload: Value) -> Vec<String> {
    let Value::Array(items) = payload else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_array_of_strings() {
        let items = coerce_candidates(json!(["apple", "apricot"]));
        assert_eq!(items, vec!["apple", "apricot"]);
    }

    #[test]
    fn test_coerce_non_sequence_is_empty() {
        assert!(coerce_candidates(json!({"items": ["apple"]})).is_empty());
        assert!(coerce_candidates(json!("apple")).is_empty());
        assert!(coerce_candidates(Value::Null).is_empty());
    }

    #[test]
    fn test_coerce_mixed_elements() {
        let items = coerce_candidates(json!(["milk", 2, true, null, {"a": 1}, ["x"]]));
        assert_eq!(items, vec!["milk", "2", "true"]);
    }
}
