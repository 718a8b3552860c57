//! Host-normalized keyboard events.

use std::fmt;

/// A keyboard event after the host has decoded it.
///
/// `key` carries a lowercase key name such as `"left"`, `"enter"`, or
/// `"a"`. Printable events also carry the produced character in `ch`.
/// Events the host could not decode arrive with `recognized == false` and
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    pub recognized: bool,
    pub key: Option<String>,
    pub printable: bool,
    pub ch: Option<char>,
    pub shift: bool,
    pub control: bool,
    pub meta: bool,
}

impl KeyEvent {
    /// A named, non-printing key such as `"left"` or `"backspace"`.
    pub fn named(key: &str) -> Self {
        Self {
            recognized: true,
            key: Some(key.to_ascii_lowercase()),
            ..Self::default()
        }
    }

    /// A key that produces `ch`.
    pub fn char(ch: char) -> Self {
        Self {
            recognized: true,
            key: Some(key_name_for(ch)),
            printable: true,
            ch: Some(ch),
            shift: ch.is_uppercase(),
            ..Self::default()
        }
    }

    /// An event the host could not decode.
    pub fn unrecognized() -> Self {
        Self::default()
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_control(mut self) -> Self {
        self.control = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Whether the event should insert its character as text.
    pub fn inserts_text(&self) -> bool {
        self.recognized && self.printable && self.ch.is_some() && !self.control && !self.meta
    }

    /// The normalized key combination, e.g. `"control-shift-home"`.
    ///
    /// Modifiers appear in the order control, meta, shift. Returns `None`
    /// when the event has no key name.
    pub fn combo(&self) -> Option<String> {
        let key = match (&self.key, self.ch) {
            (Some(key), _) => key.to_ascii_lowercase(),
            (None, Some(ch)) => key_name_for(ch),
            (None, None) => return None,
        };
        Some(KeyCombo { event: self, key: &key }.to_string())
    }
}

fn key_name_for(ch: char) -> String {
    match ch {
        ' ' => "space".to_string(),
        '\t' => "tab".to_string(),
        other => other.to_lowercase().collect(),
    }
}

struct KeyCombo<'a> {
    event: &'a KeyEvent,
    key: &'a str,
}

impl fmt::Display for KeyCombo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(4);
        if self.event.control {
            parts.push("control");
        }
        if self.event.meta {
            parts.push("meta");
        }
        // Shift is implied by an uppercase character.
        if self.event.shift && !(self.event.printable && !self.event.control && !self.event.meta) {
            parts.push("shift");
        }
        parts.push(self.key);
        write!(f, "{}", parts.join("-"))
    }
}
