//! The render tree produced by layout.
//!
//! A [`RenderTree`] mirrors the document as Block → Line → Run. Each node's
//! bounds are relative to its parent: blocks to the tree, lines to their
//! block, runs to their line. The tree is rebuilt from scratch on every
//! layout and never edited in place.

use quill_core::document::{BlockId, SpanId};
use quill_core::style::{BlockStyle, RunStyle};

use crate::error::{LayoutError, LayoutResult};
use crate::metrics::CharMetrics;
use crate::types::Rect;

/// A laid-out document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderTree {
    pub blocks: Vec<RenderBlock>,
    /// Width the tree was laid out for.
    pub width: f32,
    /// Total height of all blocks.
    pub height: f32,
}

/// A laid-out block.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBlock {
    pub block: BlockId,
    pub bounds: Rect,
    pub style: BlockStyle,
    pub lines: Vec<RenderLine>,
}

/// One visual line of a block.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderLine {
    pub bounds: Rect,
    pub runs: Vec<RenderRun>,
}

/// A contiguous piece of one span on one line.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRun {
    pub span: SpanId,
    /// First span character covered by the run.
    pub span_start: usize,
    /// One past the last span character covered by the run.
    pub span_end: usize,
    /// Snapshot of the covered characters.
    pub text: String,
    pub bounds: Rect,
    pub style: RunStyle,
}

/// Indexes of a run in a tree plus a character offset into the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RenderPath {
    pub block: usize,
    pub line: usize,
    pub run: usize,
    pub inset: usize,
}

impl RenderPath {
    pub const fn new(block: usize, line: usize, run: usize, inset: usize) -> Self {
        Self {
            block,
            line,
            run,
            inset,
        }
    }

    /// The `(block, line)` pair identifying the visual line.
    pub const fn line_key(&self) -> (usize, usize) {
        (self.block, self.line)
    }
}

impl RenderTree {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Index of the render block for a document block.
    pub fn block_index(&self, block: BlockId) -> LayoutResult<usize> {
        self.blocks
            .iter()
            .position(|b| b.block == block)
            .ok_or(LayoutError::BlockNotRendered(block))
    }

    pub fn line(&self, block: usize, line: usize) -> Option<&RenderLine> {
        self.blocks.get(block)?.lines.get(line)
    }

    /// The run a path points into.
    pub fn run(&self, path: &RenderPath) -> LayoutResult<&RenderRun> {
        self.line(path.block, path.line)
            .and_then(|l| l.runs.get(path.run))
            .ok_or(LayoutError::InvalidPath(*path))
    }

    /// Check that a path addresses a run and its inset is in range.
    pub fn validate(&self, path: &RenderPath) -> LayoutResult<()> {
        let run = self.run(path)?;
        if path.inset > run.len() {
            return Err(LayoutError::InvalidPath(*path));
        }
        Ok(())
    }

    /// Total number of visual lines.
    pub fn line_count(&self) -> usize {
        self.blocks.iter().map(|b| b.lines.len()).sum()
    }
}

impl RenderBlock {
    /// Characters laid out in this block.
    pub fn len(&self) -> usize {
        self.lines.iter().map(RenderLine::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Block-relative character offset where `line` starts.
    pub fn line_offset(&self, line: usize) -> usize {
        self.lines.iter().take(line).map(RenderLine::len).sum()
    }
}

impl RenderLine {
    /// Characters on this line.
    pub fn len(&self) -> usize {
        self.runs.iter().map(RenderRun::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Line-relative character offset where `run` starts.
    pub fn run_offset(&self, run: usize) -> usize {
        self.runs.iter().take(run).map(RenderRun::len).sum()
    }

    /// Run index and run inset for a line-relative column.
    ///
    /// A column on a run boundary resolves to the end of the earlier run.
    pub fn locate_column(&self, column: usize) -> (usize, usize) {
        let mut remaining = column;
        for (index, run) in self.runs.iter().enumerate() {
            if remaining <= run.len() {
                return (index, remaining);
            }
            remaining -= run.len();
        }
        let last = self.runs.len().saturating_sub(1);
        (last, self.runs.last().map_or(0, RenderRun::len))
    }
}

impl RenderRun {
    /// Characters in this run.
    pub fn len(&self) -> usize {
        self.span_end - self.span_start
    }

    pub fn is_empty(&self) -> bool {
        self.span_end == self.span_start
    }

    /// Horizontal offset of character boundary `inset` from the run's left edge.
    pub fn x_at(&self, inset: usize, metrics: &dyn CharMetrics) -> f32 {
        self.text
            .chars()
            .take(inset)
            .map(|ch| metrics.styled_width(ch, &self.style))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MonospaceMetrics;

    fn run(text: &str, start: usize) -> RenderRun {
        let len = text.chars().count();
        RenderRun {
            span: SpanId::default(),
            span_start: start,
            span_end: start + len,
            text: text.to_string(),
            bounds: Rect::new(0.0, 0.0, len as f32 * 10.0, 19.2),
            style: RunStyle::default(),
        }
    }

    #[test]
    fn test_line_offsets() {
        let line = RenderLine {
            bounds: Rect::ZERO,
            runs: vec![run("abc", 0), run("de", 0)],
        };
        assert_eq!(line.len(), 5);
        assert_eq!(line.run_offset(1), 3);
        assert_eq!(line.locate_column(3), (0, 3));
        assert_eq!(line.locate_column(4), (1, 1));
        assert_eq!(line.locate_column(99), (1, 2));
    }

    #[test]
    fn test_x_at() {
        let r = run("hello", 2);
        let metrics = MonospaceMetrics::new(10.0);
        assert_eq!(r.len(), 5);
        assert_eq!(r.x_at(0, &metrics), 0.0);
        assert_eq!(r.x_at(3, &metrics), 30.0);
        assert_eq!(r.x_at(10, &metrics), 50.0);
    }

    #[test]
    fn test_invalid_path() {
        let tree = RenderTree::default();
        let path = RenderPath::new(0, 0, 0, 0);
        assert_eq!(tree.run(&path), Err(LayoutError::InvalidPath(path)));
    }
}
