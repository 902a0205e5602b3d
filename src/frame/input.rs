use serde::{Deserialize, Serialize};

/// Key event as delivered by the host's input capture. Mirrors the DOM
/// keyboard event payload: named keys arrive as multi-character strings
/// ("Enter", "ArrowDown"), printable keys as a single character.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub shift_key: bool,
    #[serde(default)]
    pub ctrl_key: bool,
    #[serde(default)]
    pub alt_key: bool,
    #[serde(default)]
    pub meta_key: bool,
}

impl KeyEvent {
    pub fn character(ch: char) -> Self {
        Self::named(ch.to_string())
    }

    pub fn named(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            shift_key: false,
            ctrl_key: false,
            alt_key: false,
            meta_key: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    /// Ctrl/Alt/Meta combinations are never consumed by the engine.
    pub fn has_blocked_modifier(&self) -> bool {
        self.ctrl_key || self.alt_key || self.meta_key
    }

    /// Shift+ArrowDown is the explicit skip-line command.
    pub fn is_line_skip(&self) -> bool {
        self.shift_key && self.key == "ArrowDown"
    }

    /// A key the matcher can evaluate: one printable character, or Enter.
    pub fn is_typing_key(&self) -> bool {
        self.key == "Enter" || self.key.chars().count() == 1
    }

    /// Shift+Space skips the current target unconditionally.
    pub fn is_skip_override(&self) -> bool {
        self.shift_key && self.key == " "
    }
}
