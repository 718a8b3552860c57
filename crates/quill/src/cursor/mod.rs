//! Caret position, navigation, and selection tracking.
//!
//! The caret lives in document space as a [`Spot`] plus a [`Bias`] that
//! picks a visual line on soft wraps. Navigation that depends on the
//! visual layout (vertical moves, line edges, wrap handling) takes the
//! current [`RenderTree`]; callers must relayout after structural edits
//! before navigating.

mod motion;
pub mod paths;

use quill_core::document::{Bias, Frame, Selection, Spot};
use quill_render::metrics::CharMetrics;
use quill_render::tree::{RenderPath, RenderTree};
use quill_render::types::Point;
use quill_render::LayoutResult;

use crate::error::Result;

pub use paths::{
    block_path_to_render_path, find_box_with_xy, render_path_to_block_path, render_path_to_xy,
};

/// The insertion caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub spot: Spot,
    pub bias: Bias,
}

impl Cursor {
    pub const fn new(spot: Spot) -> Self {
        Self {
            spot,
            bias: Bias::Right,
        }
    }

    pub const fn with_bias(spot: Spot, bias: Bias) -> Self {
        Self { spot, bias }
    }

    /// A caret at the first position of the document.
    pub fn at_start(frame: &Frame) -> Option<Self> {
        frame.start_spot().map(Self::new)
    }

    /// The caret's location in `tree`.
    pub fn render_path(&self, frame: &Frame, tree: &RenderTree) -> LayoutResult<RenderPath> {
        block_path_to_render_path(frame, tree, self.spot, self.bias)
    }

    /// Top-left corner of the caret on the editing surface.
    pub fn xy(
        &self,
        frame: &Frame,
        tree: &RenderTree,
        metrics: &dyn CharMetrics,
    ) -> LayoutResult<Point> {
        render_path_to_xy(tree, &self.render_path(frame, tree)?, metrics)
    }

    /// Select the whole document and put the caret at its end.
    pub fn select_all(&mut self, frame: &mut Frame) -> Result<bool> {
        let (Some(start), Some(end)) = (frame.start_spot(), frame.end_spot()) else {
            return Ok(false);
        };
        frame.set_selection(Selection::new(start, end))?;
        *self = Self::with_bias(end, Bias::Left);
        Ok(true)
    }
}

/// Update the frame's selection after the caret moved from `from`.
///
/// With `extend`, the existing anchor (or `from` when there is no
/// selection) stays put and the selection's end follows the caret. A
/// selection that collapses to a point is dropped. Without `extend` the
/// selection is cleared.
pub fn track_selection(frame: &mut Frame, from: Spot, caret: Spot, extend: bool) -> Result<()> {
    if !extend {
        frame.clear_selection();
        return Ok(());
    }
    let anchor = frame.selection().map_or(from, |sel| sel.start);
    let selection = Selection::new(anchor, caret);
    if selection.is_collapsed(frame)? {
        frame.clear_selection();
    } else {
        frame.set_selection(selection)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_selection_keeps_anchor() {
        let mut frame = Frame::from_text("abcdef");
        let start = frame.start_spot().unwrap();
        let two = start.with_inset(2);
        let four = start.with_inset(4);

        track_selection(&mut frame, start, two, true).unwrap();
        assert_eq!(frame.selection(), Some(Selection::new(start, two)));

        track_selection(&mut frame, two, four, true).unwrap();
        assert_eq!(frame.selection(), Some(Selection::new(start, four)));

        track_selection(&mut frame, four, start, true).unwrap();
        assert_eq!(frame.selection(), None);

        track_selection(&mut frame, start, two, true).unwrap();
        track_selection(&mut frame, two, four, false).unwrap();
        assert_eq!(frame.selection(), None);
    }

    #[test]
    fn test_select_all() {
        let mut frame = Frame::from_text("ab\ncd");
        let mut cursor = Cursor::at_start(&frame).unwrap();
        assert!(cursor.select_all(&mut frame).unwrap());
        let sel = frame.selection().unwrap();
        assert_eq!(frame.text_in(&sel).unwrap(), "ab\ncd");
        assert_eq!(cursor.spot, frame.end_spot().unwrap());
    }
}
