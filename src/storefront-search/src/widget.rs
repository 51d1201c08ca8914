//! The search-suggestion widget.
//!
//! `SearchWidget` owns the input field, the suggestion list, the debounce
//! timer and the fetcher. Every mutation happens on the task that owns the
//! widget; timers and provider calls run on spawned tasks and report back
//! through an internal channel.
//!
//! ```text
//! WidgetEvent ──> handle() ──> Debouncer ──(LookupDue)──> fetcher.dispatch()
//!                                                            │ spawned
//!                 list.show() <──(LookupDone)── complete() <─┘
//! ```

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, trace};

use crate::config::SuggestConfig;
use crate::debounce::{DebounceToken, Debouncer};
use crate::error::SuggestResult;
use crate::event::{InputEdit, Key, PointerTarget, Propagation, SearchIntent, WidgetEvent};
use crate::fetcher::{FetchOutcome, SuggestionFetcher};
use crate::input::InputField;
use crate::provider::CandidateProvider;
use crate::render::{SuggestionEntry, SuggestionList};
use crate::state::{QueryState, QueryTicket};
use crate::text::{replace_trailing_word, trailing_word};

/// Capacity of the search-intent broadcast channel.
const INTENT_CHANNEL_CAPACITY: usize = 16;

/// Messages from the widget's own timers and lookups.
#[derive(Debug)]
enum Internal {
    LookupDue {
        token: DebounceToken,
        query: String,
    },
    LookupDone {
        ticket: QueryTicket,
        result: SuggestResult<Value>,
    },
}

/// Snapshot of what a host should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub value: String,
    pub focused: bool,
    pub entries: Vec<SuggestionEntry>,
    pub highlighted: Option<usize>,
}

impl WidgetView {
    /// Whether the suggestion list is shown.
    pub fn is_list_visible(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// Incremental search-suggestion widget.
pub struct SearchWidget {
    config: SuggestConfig,
    input: InputField,
    list: SuggestionList,
    fetcher: SuggestionFetcher,
    debouncer: Debouncer,
    in_flight: usize,
    internal_tx: mpsc::UnboundedSender<Internal>,
    internal_rx: mpsc::UnboundedReceiver<Internal>,
    intents: broadcast::Sender<SearchIntent>,
}

impl SearchWidget {
    /// Create a widget that looks up candidates from `provider`.
    pub fn new(provider: Arc<dyn CandidateProvider>, config: SuggestConfig) -> Self {
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let (intents, _) = broadcast::channel(INTENT_CHANNEL_CAPACITY);
        Self {
            list: SuggestionList::new(config.max_rendered),
            debouncer: Debouncer::new(config.debounce()),
            fetcher: SuggestionFetcher::new(provider),
            input: InputField::new(),
            in_flight: 0,
            internal_tx,
            internal_rx,
            intents,
            config,
        }
    }

    /// The search input.
    pub fn input(&self) -> &InputField {
        &self.input
    }

    /// The suggestion list.
    pub fn list(&self) -> &SuggestionList {
        &self.list
    }

    /// Last dispatched query and accepted suggestions.
    pub fn query_state(&self) -> &QueryState {
        self.fetcher.state()
    }

    /// Whether a debounced lookup is waiting to fire.
    pub fn is_lookup_scheduled(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Number of provider calls that have not reported back yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Receive search intents emitted by submit.
    pub fn subscribe(&self) -> broadcast::Receiver<SearchIntent> {
        self.intents.subscribe()
    }

    /// Current display snapshot.
    pub fn view(&self) -> WidgetView {
        WidgetView {
            value: self.input.value().to_string(),
            focused: self.input.is_focused(),
            entries: self.list.entries().to_vec(),
            highlighted: self.list.highlighted(),
        }
    }

    /// Handle one host event.
    pub fn handle(&mut self, event: WidgetEvent) -> Propagation {
        match event {
            WidgetEvent::Input(value) => {
                self.input.set_value(value);
                self.input.focus();
                self.on_text_changed();
                Propagation::Continue
            }
            WidgetEvent::Edit(edit) => self.on_edit(&edit),
            WidgetEvent::Key(key) => self.on_key(key),
            WidgetEvent::Pointer(target) => self.on_pointer(target),
        }
    }

    /// Accept the rendered entry at `index`. Returns false if there is none.
    pub fn pick(&mut self, index: usize) -> bool {
        let Some(entry) = self.list.entry(index) else {
            return false;
        };
        let updated = replace_trailing_word(self.input.value(), entry.value());
        debug!(candidate = entry.value(), "suggestion picked");

        self.input.set_value(updated);
        self.close();
        self.input.focus();
        true
    }

    /// Emit a search intent for the trimmed input value and close the list.
    pub fn submit(&mut self) -> SearchIntent {
        let intent = SearchIntent::from_input(self.input.value());
        info!(query = %intent.query, "search requested");
        // No subscribers is fine; the intent is fire-and-forget.
        let _ = self.intents.send(intent.clone());
        self.close();
        intent
    }

    /// Close the list without touching the input. Returns whether it was open.
    ///
    /// Also drops any scheduled lookup. Lookups already in flight are left
    /// alone; the last dispatched one is still accepted when it arrives.
    pub fn close(&mut self) -> bool {
        self.debouncer.cancel();
        self.list.close()
    }

    /// Process the next timer or lookup message.
    ///
    /// Waits until one arrives; only call when [`Self::is_lookup_scheduled`]
    /// or [`Self::in_flight`] says one is coming.
    pub async fn pump(&mut self) {
        if let Some(message) = self.internal_rx.recv().await {
            self.apply(message);
        }
    }

    /// Process messages until no lookup is scheduled or in flight.
    pub async fn settle(&mut self) {
        while self.debouncer.is_pending() || self.in_flight > 0 {
            self.pump().await;
        }
    }

    /// Drive the widget from a host event channel until it closes.
    ///
    /// A fresh [`WidgetView`] is published after every handled message.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<WidgetEvent>,
        views: watch::Sender<WidgetView>,
    ) {
        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else {
                        break;
                    };
                    self.handle(event);
                }
                Some(message) = self.internal_rx.recv() => self.apply(message),
            }
            views.send_replace(self.view());
        }
        debug!("search widget event loop stopped");
    }

    fn on_edit(&mut self, edit: &InputEdit) -> Propagation {
        self.input.apply(edit);
        self.input.focus();
        self.on_text_changed();
        Propagation::Continue
    }

    fn on_text_changed(&mut self) {
        let word = trailing_word(self.input.value());
        if !self.config.qualifies(word) {
            trace!(word, "trailing word below threshold");
            self.close();
            return;
        }

        let query = word.to_string();
        let tx = self.internal_tx.clone();
        self.debouncer.schedule(move |token| {
            let _ = tx.send(Internal::LookupDue { token, query });
        });
    }

    fn on_key(&mut self, key: Key) -> Propagation {
        match key {
            Key::Enter => {
                self.submit();
                Propagation::PreventDefault
            }
            Key::Escape => {
                self.close();
                Propagation::Continue
            }
            Key::Down if self.list.is_visible() => {
                self.list.highlight_next();
                Propagation::PreventDefault
            }
            Key::Up if self.list.is_visible() => {
                self.list.highlight_prev();
                Propagation::PreventDefault
            }
            Key::Tab => match self.list.highlighted() {
                Some(index) => {
                    if self.pick(index) {
                        Propagation::PreventDefault
                    } else {
                        Propagation::Continue
                    }
                }
                None => Propagation::Continue,
            },
            Key::Up | Key::Down => Propagation::Continue,
        }
    }

    fn on_pointer(&mut self, target: PointerTarget) -> Propagation {
        match target {
            PointerTarget::Suggestion(index) => {
                self.pick(index);
            }
            PointerTarget::SearchButton => {
                self.submit();
            }
            PointerTarget::SearchBox => {}
            PointerTarget::Outside => {
                self.close();
            }
        }
        Propagation::Continue
    }

    fn apply(&mut self, message: Internal) {
        match message {
            Internal::LookupDue { token, query } => {
                if !self.debouncer.take_fired(token) {
                    trace!(query, "dropping superseded debounce expiry");
                    return;
                }
                let lookup = self.fetcher.dispatch(&query);
                let tx = self.internal_tx.clone();
                self.in_flight += 1;
                tokio::spawn(async move {
                    let (ticket, result) = lookup.run().await;
                    let _ = tx.send(Internal::LookupDone { ticket, result });
                });
            }
            Internal::LookupDone { ticket, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                match self.fetcher.complete(&ticket, result) {
                    FetchOutcome::Accepted(suggestions) => self.list.show(&suggestions),
                    FetchOutcome::Stale => {}
                    FetchOutcome::Failed(_) => {
                        self.list.close();
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for SearchWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchWidget")
            .field("config", &self.config)
            .field("input", &self.input)
            .field("list", &self.list)
            .field("fetcher", &self.fetcher)
            .field("debouncer", &self.debouncer)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SuggestError;
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedProvider(Value);

    #[async_trait]
    impl CandidateProvider for FixedProvider {
        async fn autocomplete(&self, _query: &str) -> SuggestResult<Value> {
            Ok(self.0.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl CandidateProvider for FailingProvider {
        async fn autocomplete(&self, _query: &str) -> SuggestResult<Value> {
            Err(SuggestError::lookup("unreachable"))
        }
    }

    fn widget(payload: Value) -> SearchWidget {
        SearchWidget::new(Arc::new(FixedProvider(payload)), SuggestConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_word_never_schedules() {
        let mut widget = widget(json!(["apple"]));
        widget.handle(WidgetEvent::Input("a".into()));
        assert!(!widget.is_lookup_scheduled());

        widget.handle(WidgetEvent::Input("milk ".into()));
        assert!(!widget.is_lookup_scheduled());
        assert_eq!(widget.query_state().last_query(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_is_never_synchronous() {
        let mut widget = widget(json!(["apple"]));
        widget.handle(WidgetEvent::Input("ap".into()));
        assert!(widget.is_lookup_scheduled());
        assert_eq!(widget.query_state().last_query(), "");
        assert_eq!(widget.in_flight(), 0);

        widget.settle().await;
        assert_eq!(widget.query_state().last_query(), "ap");
        assert_eq!(widget.view().entries, vec![SuggestionEntry::new("apple")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_drive_lookups() {
        let mut widget = widget(json!(["cheese"]));
        for ch in "milk ch".chars() {
            widget.handle(WidgetEvent::Edit(InputEdit::Insert(ch)));
        }
        widget.settle().await;
        assert_eq!(widget.query_state().last_query(), "ch");
        assert!(widget.list().is_visible());

        widget.handle(WidgetEvent::Edit(InputEdit::Backspace));
        assert!(!widget.list().is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_closes_list() {
        let mut widget =
            SearchWidget::new(Arc::new(FailingProvider), SuggestConfig::default());
        widget.handle(WidgetEvent::Input("milk".into()));
        widget.settle().await;

        assert!(!widget.list().is_visible());
        assert_eq!(widget.input().value(), "milk");
    }

    #[tokio::test(start_paused = true)]
    async fn test_keyboard_highlight_and_tab() {
        let mut widget = widget(json!(["cheddar", "cheese"]));
        widget.handle(WidgetEvent::Input("milk che".into()));
        widget.settle().await;

        assert_eq!(
            widget.handle(WidgetEvent::Key(Key::Down)),
            Propagation::PreventDefault
        );
        widget.handle(WidgetEvent::Key(Key::Down));
        assert_eq!(widget.list().highlighted(), Some(1));

        assert_eq!(
            widget.handle(WidgetEvent::Key(Key::Tab)),
            Propagation::PreventDefault
        );
        assert_eq!(widget.input().value(), "milk cheese");
        assert!(!widget.list().is_visible());

        assert_eq!(
            widget.handle(WidgetEvent::Key(Key::Tab)),
            Propagation::Continue
        );
        assert_eq!(
            widget.handle(WidgetEvent::Key(Key::Down)),
            Propagation::Continue
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_pick_without_entries() {
        let mut widget = widget(json!([]));
        widget.handle(WidgetEvent::Input("bread".into()));
        widget.settle().await;

        assert!(!widget.pick(0));
        assert_eq!(widget.input().value(), "bread");
    }
}
