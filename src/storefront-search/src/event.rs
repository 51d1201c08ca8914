//! Events consumed and emitted by the search widget.

use serde::{Deserialize, Serialize};

/// Name under which search intents are published to the page.
pub const SEARCH_EVENT: &str = "storefront:search";

/// A change to the input text, for hosts that do not own a text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEdit {
    /// Append one character.
    Insert(char),
    /// Append a string (paste).
    InsertStr(String),
    /// Delete the last character.
    Backspace,
    /// Remove all text.
    Clear,
}

/// Keys the widget reacts to while the input has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Up,
    Down,
    Tab,
}

/// Where a pointer activation (click/tap) landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// A rendered suggestion entry, by index.
    Suggestion(usize),
    /// The explicit search action.
    SearchButton,
    /// Anywhere else inside the search box (input, list padding).
    SearchBox,
    /// Outside the search box.
    Outside,
}

/// Input to the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// The host replaced the whole input value (one keystroke).
    Input(String),
    /// An edit applied to the widget-owned value.
    Edit(InputEdit),
    /// A key press in the input.
    Key(Key),
    /// A pointer activation.
    Pointer(PointerTarget),
}

/// Whether the host should still run its default action for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Let the host continue with its default handling.
    Continue,
    /// The widget handled the event; suppress the default (e.g. form submit).
    PreventDefault,
}

/// Notification that the user asked to search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIntent {
    /// Trimmed input value.
    pub query: String,
}

impl SearchIntent {
    /// Build an intent from a raw input value.
    pub fn from_input(value: &str) -> Self {
        Self {
            query: value.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_intent_trims() {
        let intent = SearchIntent::from_input("  milk and cheese \n");
        assert_eq!(intent.query, "milk and cheese");
    }

    #[test]
    fn test_search_intent_json_shape() {
        let intent = SearchIntent::from_input("bread");
        assert_eq!(
            serde_json::to_value(&intent).unwrap(),
            serde_json::json!({"query": "bread"})
        );
    }
}
