//! Cursor positions and selections.

use std::cmp::Ordering;

use super::node::{BlockId, SpanId};
use super::Frame;
use crate::error::Result;

/// A cursor position: a character offset into a span.
///
/// `inset` ranges over `0..=span.len`. An inset equal to the span length
/// sits after the last character. Spots are plain values and do not follow
/// structural edits; re-derive them after splitting or merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spot {
    pub block: BlockId,
    pub span: SpanId,
    pub inset: usize,
}

impl Spot {
    pub const fn new(block: BlockId, span: SpanId, inset: usize) -> Self {
        Self { block, span, inset }
    }

    /// Same span, different inset.
    pub const fn with_inset(self, inset: usize) -> Self {
        Self { inset, ..self }
    }
}

/// Which visual line a position on a soft wrap belongs to.
///
/// A document position at the end of one wrapped line is also the start of
/// the next. `Left` places the caret at the end of the upper line, `Right`
/// at the start of the lower line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bias {
    Left,
    #[default]
    Right,
}

/// A selected range between an anchor and a moving edge.
///
/// `start` is the anchor. The two ends are kept in the order they were set;
/// use [`ordered`](Self::ordered) for document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub start: Spot,
    pub end: Spot,
}

impl Selection {
    pub const fn new(start: Spot, end: Spot) -> Self {
        Self { start, end }
    }

    /// A selection with no extent.
    pub const fn collapsed(at: Spot) -> Self {
        Self { start: at, end: at }
    }

    /// Both ends in document order.
    pub fn ordered(&self, frame: &Frame) -> Result<(Spot, Spot)> {
        Ok(match frame.compare_spots(self.start, self.end)? {
            Ordering::Greater => (self.end, self.start),
            _ => (self.start, self.end),
        })
    }

    /// Whether both ends address the same document position.
    pub fn is_collapsed(&self, frame: &Frame) -> Result<bool> {
        Ok(frame.compare_spots(self.start, self.end)? == Ordering::Equal)
    }
}
