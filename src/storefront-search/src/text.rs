//! Text helpers for the word currently being typed.
//!
//! The trailing word is the maximal run of non-whitespace characters that
//! ends at the end of the text. Text that is empty or ends in whitespace has
//! an empty trailing word.

use std::borrow::Cow;

/// Byte offset where the trailing word starts.
///
/// Equals `text.len()` when the trailing word is empty.
pub fn trailing_word_start(text: &str) -> usize {
    text.char_indices()
        .rev()
        .find(|(_, ch)| ch.is_whitespace())
        .map(|(idx, ch)| idx + ch.len_utf8())
        .unwrap_or(0)
}

/// Returns the word currently being typed at the end of `text`.
pub fn trailing_word(text: &str) -> &str {
    &text[trailing_word_start(text)..]
}

/// Replaces the trailing word of `text` with `replacement`.
///
/// Everything before the trailing word is kept verbatim. Empty or
/// all-whitespace text is replaced entirely.
pub fn replace_trailing_word(text: &str, replacement: &str) -> String {
    if text.trim().is_empty() {
        return replacement.to_string();
    }
    let start = trailing_word_start(text);
    let mut updated = String::with_capacity(start + replacement.len());
    updated.push_str(&text[..start]);
    updated.push_str(replacement);
    updated
}

/// Escapes `& < > " '` for safe inclusion in HTML text and attributes.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}
