//! Suggestion fetcher with the "last dispatched wins" race guard.
//!
//! Dispatching and completing are split so the owner can await the provider
//! on a separate task while keeping every state mutation on its own loop:
//!
//! ```text
//! dispatch(q) -> Lookup --(spawned, awaits provider)--> complete(ticket, result)
//! ```
//!
//! In-flight requests are never cancelled. A response whose ticket has been
//! superseded by a newer dispatch is dropped in [`SuggestionFetcher::complete`].

use std::sync::Arc;

use serde_json::Value;

use crate::error::{SuggestError, SuggestResult};
use crate::provider::{CandidateProvider, coerce_candidates};
use crate::state::{QueryState, QueryTicket};

/// Result of completing a lookup.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Response belongs to the freshest dispatch; hand these to the renderer.
    Accepted(Vec<String>),
    /// A newer dispatch superseded this one; nothing to do.
    Stale,
    /// The freshest dispatch failed; the list should close.
    Failed(SuggestError),
}

/// One dispatched request, ready to be awaited off the owner's loop.
pub struct Lookup {
    ticket: QueryTicket,
    provider: Arc<dyn CandidateProvider>,
}

impl Lookup {
    /// Await the provider. Suspends only the caller.
    pub async fn run(self) -> (QueryTicket, SuggestResult<Value>) {
        let result = self.provider.autocomplete(self.ticket.query()).await;
        (self.ticket, result)
    }
}

/// Issues lookups and applies their results in dispatch order.
pub struct SuggestionFetcher {
    provider: Arc<dyn CandidateProvider>,
    state: QueryState,
}

impl SuggestionFetcher {
    /// Create a fetcher backed by `provider`.
    pub fn new(provider: Arc<dyn CandidateProvider>) -> Self {
        Self {
            provider,
            state: QueryState::new(),
        }
    }

    /// Read-only view of the query state.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Record `query` as the latest dispatch and prepare its request.
    pub fn dispatch(&mut self, query: &str) -> Lookup {
        let ticket = self.state.begin(query);
        tracing::debug!(query, id = ticket.id(), "dispatching suggestion lookup");
        Lookup {
            ticket,
            provider: Arc::clone(&self.provider),
        }
    }

    /// Apply the result of a lookup.
    pub fn complete(&mut self, ticket: &QueryTicket, result: SuggestResult<Value>) -> FetchOutcome {
        if !self.state.is_current(ticket) {
            tracing::debug!(
                query = ticket.query(),
                latest = self.state.last_query(),
                showing = ?self.state.suggestions_id(),
                "discarding stale suggestions"
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(payload) => {
                let suggestions = coerce_candidates(payload);
                self.state.accept(ticket, suggestions.clone());
                FetchOutcome::Accepted(suggestions)
            }
            Err(err) => {
                tracing::debug!(query = ticket.query(), error = %err, "suggestion lookup failed");
                FetchOutcome::Failed(err)
            }
        }
    }
}

impl std::fmt::Debug for SuggestionFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionFetcher")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoProvider;

    #[async_trait]
    impl CandidateProvider for EchoProvider {
        async fn autocomplete(&self, query: &str) -> SuggestResult<Value> {
            if query == "boom" {
                return Err(SuggestError::lookup("boom"));
            }
            Ok(json!([format!("{query}-1"), format!("{query}-2")]))
        }
    }

    fn fetcher() -> SuggestionFetcher {
        SuggestionFetcher::new(Arc::new(EchoProvider))
    }

    #[tokio::test]
    async fn test_dispatch_and_accept() {
        let mut fetcher = fetcher();
        let lookup = fetcher.dispatch("ap");
        assert_eq!(fetcher.state().last_query(), "ap");

        let (ticket, result) = lookup.run().await;
        match fetcher.complete(&ticket, result) {
            FetchOutcome::Accepted(items) => assert_eq!(items, vec!["ap-1", "ap-2"]),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(fetcher.state().last_suggestions().len(), 2);
    }

    #[tokio::test]
    async fn test_late_response_for_older_query_is_stale() {
        let mut fetcher = fetcher();
        let ap = fetcher.dispatch("ap");
        let app = fetcher.dispatch("app");

        // "app" resolves first, "ap" arrives afterwards.
        let (app_ticket, app_result) = app.run().await;
        let (ap_ticket, ap_result) = ap.run().await;

        assert!(matches!(
            fetcher.complete(&app_ticket, app_result),
            FetchOutcome::Accepted(_)
        ));
        assert!(matches!(
            fetcher.complete(&ap_ticket, ap_result),
            FetchOutcome::Stale
        ));
        assert_eq!(fetcher.state().last_suggestions(), ["app-1", "app-2"]);
    }

    #[tokio::test]
    async fn test_failure_of_current_lookup() {
        let mut fetcher = fetcher();
        let (ticket, result) = fetcher.dispatch("boom").run().await;
        assert!(matches!(
            fetcher.complete(&ticket, result),
            FetchOutcome::Failed(SuggestError::Lookup(_))
        ));
    }

    #[tokio::test]
    async fn test_failure_of_stale_lookup_is_ignored() {
        let mut fetcher = fetcher();
        let boom = fetcher.dispatch("boom");
        let _milk = fetcher.dispatch("milk");

        let (ticket, result) = boom.run().await;
        assert!(matches!(fetcher.complete(&ticket, result), FetchOutcome::Stale));
    }

    #[tokio::test]
    async fn test_non_sequence_payload_is_empty() {
        struct ObjectProvider;

        #[async_trait]
        impl CandidateProvider for ObjectProvider {
            async fn autocomplete(&self, _query: &str) -> SuggestResult<Value> {
                Ok(json!({"error": "nope"}))
            }
        }

        let mut fetcher = SuggestionFetcher::new(Arc::new(ObjectProvider));
        let (ticket, result) = fetcher.dispatch("milk").run().await;
        match fetcher.complete(&ticket, result) {
            FetchOutcome::Accepted(items) => assert!(items.is_empty()),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
