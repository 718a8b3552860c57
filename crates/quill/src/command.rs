//! Editor commands and their action names.

use std::str::FromStr;

use crate::error::EditorError;

/// Direction of a cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Which end of a line or document to jump to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Start,
    End,
}

/// A single editing or navigation step.
///
/// Commands carry no state of their own; [`EditorSession::apply`] executes
/// them against the session.
///
/// [`EditorSession::apply`]: crate::EditorSession::apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move one character or line. With `extend`, grow the selection.
    MoveCursor { axis: Axis, delta: i32, extend: bool },
    MoveWord { delta: i32, extend: bool },
    MoveLineEdge { edge: Edge, extend: bool },
    MoveDocumentEdge { edge: Edge, extend: bool },
    SelectAll,
    ClearSelection,
    InsertChar(char),
    InsertText(String),
    DeleteForward,
    DeleteBackward,
    /// Split the block in a multi-line session, otherwise run the enter action.
    Enter,
    SplitBlock,
    /// Apply a named style, or clear it with `None`.
    ApplyStyle { name: Option<String> },
    Autocomplete,
    PopupMove(i32),
    PopupAccept,
    PopupDismiss,
}

/// What a command requires of the host after it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Effect {
    /// Nothing changed.
    #[default]
    None,
    /// Cursor, selection, or popup changed; repaint.
    Redraw,
    /// The document changed; the tree was rebuilt and must be repainted.
    Relayout,
}

impl Effect {
    /// Whether anything needs to be painted.
    pub fn needs_redraw(self) -> bool {
        self != Effect::None
    }
}

impl Command {
    /// Look up a command by its keymap action name.
    ///
    /// Besides the fixed names, `"style:<name>"` applies the named style.
    pub fn from_action(action: &str) -> Option<Command> {
        use Axis::{Horizontal, Vertical};

        let move_cursor = |axis, delta, extend| Command::MoveCursor { axis, delta, extend };
        let command = match action {
            "move-left" => move_cursor(Horizontal, -1, false),
            "move-right" => move_cursor(Horizontal, 1, false),
            "move-up" => move_cursor(Vertical, -1, false),
            "move-down" => move_cursor(Vertical, 1, false),
            "select-left" => move_cursor(Horizontal, -1, true),
            "select-right" => move_cursor(Horizontal, 1, true),
            "select-up" => move_cursor(Vertical, -1, true),
            "select-down" => move_cursor(Vertical, 1, true),
            "word-left" => Command::MoveWord { delta: -1, extend: false },
            "word-right" => Command::MoveWord { delta: 1, extend: false },
            "select-word-left" => Command::MoveWord { delta: -1, extend: true },
            "select-word-right" => Command::MoveWord { delta: 1, extend: true },
            "line-start" => Command::MoveLineEdge { edge: Edge::Start, extend: false },
            "line-end" => Command::MoveLineEdge { edge: Edge::End, extend: false },
            "select-line-start" => Command::MoveLineEdge { edge: Edge::Start, extend: true },
            "select-line-end" => Command::MoveLineEdge { edge: Edge::End, extend: true },
            "document-start" => Command::MoveDocumentEdge { edge: Edge::Start, extend: false },
            "document-end" => Command::MoveDocumentEdge { edge: Edge::End, extend: false },
            "select-document-start" => {
                Command::MoveDocumentEdge { edge: Edge::Start, extend: true }
            }
            "select-document-end" => Command::MoveDocumentEdge { edge: Edge::End, extend: true },
            "select-all" => Command::SelectAll,
            "clear-selection" => Command::ClearSelection,
            "delete-backward" => Command::DeleteBackward,
            "delete-forward" => Command::DeleteForward,
            "enter" => Command::Enter,
            "split-block" => Command::SplitBlock,
            "start-bold" => Command::ApplyStyle { name: Some("bold".to_string()) },
            "start-italic" => Command::ApplyStyle { name: Some("italic".to_string()) },
            "clear-style" => Command::ApplyStyle { name: None },
            "autocomplete" => Command::Autocomplete,
            "popup-up" => Command::PopupMove(-1),
            "popup-down" => Command::PopupMove(1),
            "popup-accept" => Command::PopupAccept,
            "popup-dismiss" => Command::PopupDismiss,
            other => {
                let name = other.strip_prefix("style:")?;
                if name.is_empty() {
                    return None;
                }
                Command::ApplyStyle { name: Some(name.to_string()) }
            }
        };
        Some(command)
    }
}

impl FromStr for Command {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::from_action(s.trim()).ok_or_else(|| EditorError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names() {
        assert_eq!(
            "select-left".parse::<Command>().unwrap(),
            Command::MoveCursor { axis: Axis::Horizontal, delta: -1, extend: true }
        );
        assert_eq!(
            Command::from_action("start-bold"),
            Some(Command::ApplyStyle { name: Some("bold".into()) })
        );
        assert_eq!(
            Command::from_action("style:heading"),
            Some(Command::ApplyStyle { name: Some("heading".into()) })
        );
        assert_eq!(Command::from_action("style:"), None);
        assert!(matches!(
            "fly-away".parse::<Command>(),
            Err(EditorError::UnknownAction(name)) if name == "fly-away"
        ));
    }

    #[test]
    fn test_effect_ordering() {
        assert!(Effect::Relayout > Effect::Redraw);
        assert!(Effect::Redraw > Effect::None);
        assert!(!Effect::None.needs_redraw());
    }
}
