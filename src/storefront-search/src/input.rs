//! Search input field owned by the widget.

use crate::event::InputEdit;

/// Text value and focus of the search input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    value: String,
    focused: bool,
}

impl InputField {
    /// Create an empty, unfocused field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the text.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Apply a single edit at the end of the text.
    pub fn apply(&mut self, edit: &InputEdit) {
        match edit {
            InputEdit::Insert(ch) => self.value.push(*ch),
            InputEdit::InsertStr(s) => self.value.push_str(s),
            InputEdit::Backspace => {
                self.value.pop();
            }
            InputEdit::Clear => self.value.clear(),
        }
    }

    /// Whether the field has input focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Give the field input focus.
    pub fn focus(&mut self) {
        self.focused = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edits() {
        let mut field = InputField::new();
        field.apply(&InputEdit::InsertStr("mil".into()));
        field.apply(&InputEdit::Insert('k'));
        assert_eq!(field.value(), "milk");

        field.apply(&InputEdit::Backspace);
        assert_eq!(field.value(), "mil");

        field.apply(&InputEdit::Clear);
        assert_eq!(field.value(), "");
        field.apply(&InputEdit::Backspace);
        assert_eq!(field.value(), "");
    }

    #[test]
    fn test_backspace_removes_whole_char() {
        let mut field = InputField::new();
        field.set_value("crè");
        field.apply(&InputEdit::Backspace);
        assert_eq!(field.value(), "cr");
    }

    #[test]
    fn test_focus() {
        let mut field = InputField::new();
        assert!(!field.is_focused());
        field.focus();
        assert!(field.is_focused());
    }
}
