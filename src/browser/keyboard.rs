//! Keyboard keys used by the suite.
//!
//! Text is entered with [`Browser::fill`](super::Browser::fill); keys are only
//! needed for submitting and moving focus.

// ============================================================================
// Key Enum
// ============================================================================

/// Non-printable keys that can be pressed on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Enter/Return key
    Enter,
    /// Tab key
    Tab,
    /// Escape key
    Escape,
    /// Backspace key
    Backspace,
}

impl Key {
    /// Returns the key properties: (key, code, keyCode).
    #[must_use]
    pub fn properties(self) -> (&'static str, &'static str, u32) {
        match self {
            Key::Enter => ("Enter", "Enter", 13),
            Key::Tab => ("Tab", "Tab", 9),
            Key::Escape => ("Escape", "Escape", 27),
            Key::Backspace => ("Backspace", "Backspace", 8),
        }
    }

    /// Returns the DOM `key` value.
    #[inline]
    #[must_use]
    pub fn key(self) -> &'static str {
        self.properties().0
    }

    /// Returns the DOM `code` value.
    #[inline]
    #[must_use]
    pub fn code(self) -> &'static str {
        self.properties().1
    }

    /// Returns the legacy keyCode.
    #[inline]
    #[must_use]
    pub fn key_code(self) -> u32 {
        self.properties().2
    }

    /// Returns the text the key inserts, if any.
    ///
    /// Enter needs `"\r"` for the browser to fire `keypress` and submit forms.
    #[must_use]
    pub fn text(self) -> Option<&'static str> {
        match self {
            Key::Enter => Some("\r"),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_properties() {
        assert_eq!(Key::Enter.properties(), ("Enter", "Enter", 13));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Key::Tab.key(), "Tab");
        assert_eq!(Key::Escape.code(), "Escape");
        assert_eq!(Key::Backspace.key_code(), 8);
    }

    #[test]
    fn test_only_enter_inserts_text() {
        assert_eq!(Key::Enter.text(), Some("\r"));
        assert_eq!(Key::Tab.text(), None);
    }
}
