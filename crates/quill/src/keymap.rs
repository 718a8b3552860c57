//! Key combination to action bindings.

use std::collections::BTreeMap;

use crate::command::Command;
use crate::error::{EditorError, Result};
use crate::input::KeyEvent;

const DEFAULT_BINDINGS: &[(&str, &str)] = &[
    ("left", "move-left"),
    ("right", "move-right"),
    ("up", "move-up"),
    ("down", "move-down"),
    ("shift-left", "select-left"),
    ("shift-right", "select-right"),
    ("shift-up", "select-up"),
    ("shift-down", "select-down"),
    ("control-left", "word-left"),
    ("control-right", "word-right"),
    ("control-shift-left", "select-word-left"),
    ("control-shift-right", "select-word-right"),
    ("home", "line-start"),
    ("end", "line-end"),
    ("shift-home", "select-line-start"),
    ("shift-end", "select-line-end"),
    ("control-home", "document-start"),
    ("control-end", "document-end"),
    ("control-shift-home", "select-document-start"),
    ("control-shift-end", "select-document-end"),
    ("control-a", "select-all"),
    ("meta-a", "select-all"),
    ("backspace", "delete-backward"),
    ("delete", "delete-forward"),
    ("enter", "enter"),
    ("escape", "clear-selection"),
    ("control-b", "start-bold"),
    ("meta-b", "start-bold"),
    ("control-i", "start-italic"),
    ("meta-i", "start-italic"),
    ("control-space", "autocomplete"),
];

/// Bindings consulted while the autocomplete popup is visible.
const POPUP_BINDINGS: &[(&str, &str)] = &[
    ("up", "popup-up"),
    ("down", "popup-down"),
    ("enter", "popup-accept"),
    ("escape", "popup-dismiss"),
];

/// Maps key combinations (as produced by [`KeyEvent::combo`]) to action names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    bindings: BTreeMap<String, String>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Keymap {
    /// The built-in bindings.
    pub fn with_defaults() -> Self {
        Self {
            bindings: DEFAULT_BINDINGS
                .iter()
                .map(|(combo, action)| (combo.to_string(), action.to_string()))
                .collect(),
        }
    }

    /// Bind `combo` to `action`, replacing any previous binding.
    ///
    /// Fails with [`EditorError::UnknownAction`] if the action does not exist.
    pub fn bind(&mut self, combo: &str, action: &str) -> Result<()> {
        if Command::from_action(action).is_none() {
            return Err(EditorError::UnknownAction(action.to_string()));
        }
        self.bindings.insert(normalize(combo), action.to_string());
        Ok(())
    }

    pub fn unbind(&mut self, combo: &str) -> Option<String> {
        self.bindings.remove(&normalize(combo))
    }

    pub fn action_for(&self, combo: &str) -> Option<&str> {
        self.bindings.get(&normalize(combo)).map(String::as_str)
    }

    /// Resolve an event to a command.
    ///
    /// With `popup_visible`, the popup's navigation keys take precedence.
    pub fn resolve(&self, event: &KeyEvent, popup_visible: bool) -> Option<Command> {
        let combo = event.combo()?;
        if popup_visible {
            if let Some((_, action)) = POPUP_BINDINGS.iter().find(|(c, _)| *c == combo) {
                return Command::from_action(action);
            }
        }
        self.action_for(&combo).and_then(Command::from_action)
    }

    /// All bindings in combo order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(c, a)| (c.as_str(), a.as_str()))
    }
}

/// Combos are stored trimmed and lowercase, matching [`KeyEvent::combo`].
fn normalize(combo: &str) -> String {
    combo.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Axis, Edge};

    #[test]
    fn test_default_bindings_are_valid() {
        for (combo, action) in Keymap::with_defaults().iter() {
            assert!(Command::from_action(action).is_some(), "{combo} -> {action}");
        }
    }

    #[test]
    fn test_resolve() {
        let keymap = Keymap::default();
        assert_eq!(
            keymap.resolve(&KeyEvent::named("left").with_shift(), false),
            Some(Command::MoveCursor { axis: Axis::Horizontal, delta: -1, extend: true })
        );
        assert_eq!(
            keymap.resolve(&KeyEvent::named("end").with_control(), false),
            Some(Command::MoveDocumentEdge { edge: Edge::End, extend: false })
        );
        assert_eq!(keymap.resolve(&KeyEvent::named("f13"), false), None);
    }

    #[test]
    fn test_popup_intercepts_navigation() {
        let keymap = Keymap::default();
        assert_eq!(
            keymap.resolve(&KeyEvent::named("down"), true),
            Some(Command::PopupMove(1))
        );
        assert_eq!(
            keymap.resolve(&KeyEvent::named("enter"), true),
            Some(Command::PopupAccept)
        );
        assert_eq!(keymap.resolve(&KeyEvent::named("enter"), false), Some(Command::Enter));
    }

    #[test]
    fn test_bind_override() {
        let mut keymap = Keymap::default();
        keymap.bind("control-h", "style:heading").unwrap();
        keymap.bind("control-b", "start-italic").unwrap();
        assert!(keymap.bind("control-q", "quit").is_err());

        assert_eq!(
            keymap.resolve(&KeyEvent::char('b').with_control(), false),
            Some(Command::ApplyStyle { name: Some("italic".into()) })
        );
        assert_eq!(keymap.action_for("control-h"), Some("style:heading"));
        assert_eq!(keymap.unbind("control-h").as_deref(), Some("style:heading"));
    }

    #[test]
    fn test_unbind_normalizes_combo() {
        let mut keymap = Keymap::default();
        assert_eq!(keymap.unbind(" Control-B "), Some("start-bold".to_string()));
        assert_eq!(keymap.resolve(&KeyEvent::char('b').with_control(), false), None);

        keymap.bind("Control-H", "style:heading").unwrap();
        assert_eq!(keymap.action_for("control-h"), Some("style:heading"));
        assert_eq!(keymap.action_for("CONTROL-H"), Some("style:heading"));
    }
}
