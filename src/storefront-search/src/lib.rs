#![allow(clippy::missing_errors_doc, clippy::uninlined_format_args)]
//! Storefront Search - incremental search suggestions for the product search box.
//!
//! This crate implements the suggestion widget that sits under the search
//! input: it watches text changes, debounces them, looks up candidates for the
//! word currently being typed, and lets the user accept a candidate that
//! replaces only that word.
//!
//! # Features
//!
//! - Trailing-word extraction and replacement
//! - Single-slot debounce timer that reschedules on every keystroke
//! - "Last dispatched wins" race guard for overlapping lookups
//! - Bounded, HTML-escaped suggestion list
//! - Pick / submit / dismiss handling with search-intent broadcast
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use storefront_search::{CandidateProvider, SearchWidget, SuggestConfig, WidgetEvent};
//!
//! # async fn demo(provider: Arc<dyn CandidateProvider>) {
//! let widget = SearchWidget::new(provider, SuggestConfig::default());
//! let mut intents = widget.subscribe();
//! let (events_tx, events_rx) = tokio::sync::mpsc::channel(64);
//! let (views_tx, _views_rx) = tokio::sync::watch::channel(widget.view());
//!
//! tokio::spawn(widget.run(events_rx, views_tx));
//! events_tx
//!     .send(WidgetEvent::Input("milk and che".into()))
//!     .await
//!     .ok();
//!
//! if let Ok(intent) = intents.recv().await {
//!     println!("search for {}", intent.query);
//! }
//! # }
//! ```

mod config;
mod debounce;
mod error;
mod event;
mod fetcher;
mod input;
mod provider;
mod render;
mod state;
mod text;
mod widget;

pub use config::{SuggestConfig, SuggestConfigBuilder};
pub use debounce::{DebounceToken, Debouncer};
pub use error::{SuggestError, SuggestResult};
pub use event::{InputEdit, Key, PointerTarget, Propagation, SEARCH_EVENT, SearchIntent, WidgetEvent};
pub use fetcher::{FetchOutcome, Lookup, SuggestionFetcher};
pub use input::InputField;
pub use provider::{CandidateProvider, coerce_candidates};
pub use render::{SuggestionEntry, SuggestionList};
pub use state::{QueryState, QueryTicket};
pub use text::{escape_html, replace_trailing_word, trailing_word, trailing_word_start};
pub use widget::{SearchWidget, WidgetView};

/// Minimum trailing-word length (in characters) that triggers a lookup.
pub const MIN_QUERY_CHARS: usize = 2;

/// Quiet period after the last keystroke before a lookup is dispatched.
pub const DEBOUNCE_MS: u64 = 250;

/// Maximum number of suggestions rendered at once.
pub const MAX_RENDERED: usize = 8;
