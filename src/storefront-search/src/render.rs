//! Suggestion list rendering.
//!
//! The list holds at most `max_rendered` entries. It is visible exactly when
//! it holds at least one entry; closing clears it.

use std::borrow::Cow;

use crate::MAX_RENDERED;
use crate::text::escape_html;

/// One selectable entry in the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionEntry {
    value: String,
}

impl SuggestionEntry {
    /// Create an entry for a raw candidate.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Raw candidate text, inserted verbatim when the entry is picked.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Display-safe candidate text.
    pub fn display(&self) -> Cow<'_, str> {
        escape_html(&self.value)
    }

    /// Markup for a page host; the raw value travels in `data-text`.
    pub fn to_html(&self) -> String {
        let safe = self.display();
        format!(
            r#"<button type="button" class="list-group-item list-group-item-action" data-text="{safe}">{safe}</button>"#
        )
    }
}

/// Rendered suggestion list with an optional keyboard highlight.
#[derive(Debug, Clone)]
pub struct SuggestionList {
    entries: Vec<SuggestionEntry>,
    max_rendered: usize,
    highlighted: Option<usize>,
}

impl Default for SuggestionList {
    fn default() -> Self {
        Self::new(MAX_RENDERED)
    }
}

impl SuggestionList {
    /// Create an empty, hidden list that renders up to `max_rendered` entries.
    pub fn new(max_rendered: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_rendered,
            highlighted: None,
        }
    }

    /// Render the first `max_rendered` candidates. An empty slice closes the list.
    pub fn show(&mut self, candidates: &[String]) {
        if candidates.is_empty() {
            self.close();
            return;
        }

        self.entries = candidates
            .iter()
            .take(self.max_rendered)
            .map(SuggestionEntry::new)
            .collect();
        self.highlighted = None;
    }

    /// Clear and hide the list. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        self.highlighted = None;
        if self.entries.is_empty() {
            return false;
        }
        self.entries.clear();
        true
    }

    /// Whether the list is shown.
    pub fn is_visible(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Rendered entries, in candidate order.
    pub fn entries(&self) -> &[SuggestionEntry] {
        &self.entries
    }

    /// Entry at `index`, if rendered.
    pub fn entry(&self, index: usize) -> Option<&SuggestionEntry> {
        self.entries.get(index)
    }

    /// Index of the highlighted entry.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Move the highlight down, wrapping to the top.
    pub fn highlight_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) => (i + 1) % self.entries.len(),
            None => 0,
        });
    }

    /// Move the highlight up, wrapping to the bottom.
    pub fn highlight_prev(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(0) | None => self.entries.len() - 1,
            Some(i) => i - 1,
        });
    }

    /// Markup for all entries, or an empty string when hidden.
    pub fn to_html(&self) -> String {
        self.entries.iter().map(SuggestionEntry::to_html).collect()
    }
}
