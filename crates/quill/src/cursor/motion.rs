use quill_core::document::{Bias, Frame, SpanId, Spot};
use quill_core::logging::targets;
use quill_render::tree::{RenderPath, RenderTree};
use unicode_segmentation::UnicodeSegmentation;

use super::paths::{bias_for, column_of, render_path_to_block_path};
use super::Cursor;
use crate::command::Edge;
use crate::error::Result;

impl Cursor {
    /// Move one character per unit of `delta`. Returns whether the caret changed.
    ///
    /// On a soft wrap, the first step toward the other line only flips the
    /// bias. Stepping past a span start lands one character into the
    /// previous span; stepping past a block edge crosses into the adjacent
    /// block. Document edges are no-ops.
    pub fn move_h(&mut self, frame: &Frame, tree: &RenderTree, delta: i32) -> Result<bool> {
        let mut changed = false;
        for _ in 0..delta.unsigned_abs() {
            if !self.step_h(frame, tree, delta > 0)? {
                break;
            }
            changed = true;
        }
        Ok(changed)
    }

    fn step_h(&mut self, frame: &Frame, tree: &RenderTree, forward: bool) -> Result<bool> {
        let path = self.render_path(frame, tree)?;
        let lines = tree.blocks[path.block].lines.len();
        let column = column_of(tree, &path)?;
        let line_len = tree.line(path.block, path.line).map_or(0, |l| l.len());

        if forward && self.bias == Bias::Left && column == line_len && path.line + 1 < lines {
            self.bias = Bias::Right;
            return Ok(true);
        }
        if !forward && self.bias == Bias::Right && column == 0 && path.line > 0 {
            self.bias = Bias::Left;
            return Ok(true);
        }

        let spot = self.spot;
        let len = frame.span(spot.span)?.len();
        let next = if forward {
            if spot.inset < len {
                Some(spot.with_inset(spot.inset + 1))
            } else if let Some(span) = text_span_beside(frame, spot.span, true)? {
                Some(Spot::new(spot.block, span, 1))
            } else {
                match frame.next_block(spot.block)? {
                    Some(block) => frame
                        .first_span(block)?
                        .map(|span| Spot::new(block, span, 0)),
                    None => None,
                }
            }
        } else if spot.inset > 0 {
            Some(spot.with_inset(spot.inset - 1))
        } else if let Some(span) = text_span_beside(frame, spot.span, false)? {
            let prev_len = frame.span(span)?.len();
            Some(Spot::new(spot.block, span, prev_len - 1))
        } else {
            match frame.prev_block(spot.block)? {
                Some(block) => match frame.last_span(block)? {
                    Some(span) => Some(Spot::new(block, span, frame.span(span)?.len())),
                    None => None,
                },
                None => None,
            }
        };

        let Some(next) = next else {
            tracing::trace!(target: targets::CURSOR, forward, "at document edge");
            return Ok(false);
        };
        self.spot = next;
        self.bias = if forward { Bias::Left } else { Bias::Right };
        Ok(true)
    }

    /// Move to the same column on the previous (`delta < 0`) or next line.
    ///
    /// Crosses block boundaries. At the first or last line of the document
    /// the caret stays put.
    pub fn move_v(&mut self, frame: &Frame, tree: &RenderTree, delta: i32) -> Result<bool> {
        let mut changed = false;
        for _ in 0..delta.unsigned_abs() {
            if !self.step_v(frame, tree, delta > 0)? {
                break;
            }
            changed = true;
        }
        Ok(changed)
    }

    fn step_v(&mut self, frame: &Frame, tree: &RenderTree, down: bool) -> Result<bool> {
        let path = self.render_path(frame, tree)?;
        let column = column_of(tree, &path)?;

        let target = if down {
            if path.line + 1 < tree.blocks[path.block].lines.len() {
                Some((path.block, path.line + 1))
            } else if path.block + 1 < tree.blocks.len() {
                Some((path.block + 1, 0))
            } else {
                None
            }
        } else if path.line > 0 {
            Some((path.block, path.line - 1))
        } else if path.block > 0 {
            let block = path.block - 1;
            Some((block, tree.blocks[block].lines.len().saturating_sub(1)))
        } else {
            None
        };
        let Some((block, line_index)) = target else {
            tracing::trace!(target: targets::CURSOR, down, "at first or last line");
            return Ok(false);
        };

        let Some(line) = tree.line(block, line_index) else {
            return Ok(false);
        };
        let (run, inset) = line.locate_column(column.min(line.len()));
        let landing = RenderPath::new(block, line_index, run, inset);
        self.spot = render_path_to_block_path(tree, &landing)?;
        self.bias = bias_for(tree, &landing);
        Ok(true)
    }

    /// Jump to the next word end (`delta > 0`) or previous word start.
    ///
    /// At a block edge the caret crosses into the adjacent block.
    pub fn move_word(&mut self, frame: &Frame, delta: i32) -> Result<bool> {
        let mut changed = false;
        for _ in 0..delta.unsigned_abs() {
            if !self.step_word(frame, delta > 0)? {
                break;
            }
            changed = true;
        }
        Ok(changed)
    }

    fn step_word(&mut self, frame: &Frame, forward: bool) -> Result<bool> {
        let block = self.spot.block;
        let offset = frame.block_offset(self.spot)?;
        let len = frame.block(block)?.len();

        let spot = if forward && offset == len {
            match frame.next_block(block)? {
                Some(next) => frame.spot_at(next, 0)?,
                None => return Ok(false),
            }
        } else if !forward && offset == 0 {
            match frame.prev_block(block)? {
                Some(prev) => {
                    let prev_len = frame.block(prev)?.len();
                    frame.spot_at(prev, prev_len)?
                }
                None => return Ok(false),
            }
        } else {
            let text = frame.block_text(block)?;
            let target = if forward {
                next_word_end(&text, offset)
            } else {
                prev_word_start(&text, offset)
            };
            frame.spot_at(block, target)?
        };

        self.spot = spot;
        self.bias = if forward { Bias::Left } else { Bias::Right };
        Ok(true)
    }

    /// Jump to the start or end of the caret's visual line.
    pub fn move_line_edge(&mut self, frame: &Frame, tree: &RenderTree, edge: Edge) -> Result<bool> {
        let path = self.render_path(frame, tree)?;
        let Some(line) = tree.line(path.block, path.line) else {
            return Ok(false);
        };
        let column = match edge {
            Edge::Start => 0,
            Edge::End => line.len(),
        };
        let (run, inset) = line.locate_column(column);
        let landing = RenderPath::new(path.block, path.line, run, inset);
        let before = *self;
        self.spot = render_path_to_block_path(tree, &landing)?;
        self.bias = bias_for(tree, &landing);
        Ok(*self != before)
    }

    /// Jump to the start or end of the document.
    pub fn move_document_edge(&mut self, frame: &Frame, edge: Edge) -> Result<bool> {
        let target = match edge {
            Edge::Start => frame.start_spot().map(Cursor::new),
            Edge::End => frame.end_spot().map(|spot| Cursor::with_bias(spot, Bias::Left)),
        };
        let Some(target) = target else {
            return Ok(false);
        };
        let changed = target != *self;
        *self = target;
        Ok(changed)
    }
}

fn byte_at(text: &str, index: usize) -> usize {
    text.char_indices().nth(index).map_or(text.len(), |(i, _)| i)
}

fn is_word(segment: &str) -> bool {
    segment.chars().any(char::is_alphanumeric)
}

/// Nearest non-empty span after (`forward`) or before `span` in its block.
///
/// Empty spans hold no position of their own; stepping onto one would
/// leave the block offset unchanged.
fn text_span_beside(frame: &Frame, span: SpanId, forward: bool) -> Result<Option<SpanId>> {
    let mut current = span;
    loop {
        let beside = if forward {
            frame.next_span(current)?
        } else {
            frame.prev_span(current)?
        };
        match beside {
            Some(next) if frame.span(next)?.is_empty() => current = next,
            other => return Ok(other),
        }
    }
}

/// Character offset just past the next word at or after `offset`.
fn next_word_end(text: &str, offset: usize) -> usize {
    let rest = &text[byte_at(text, offset)..];
    let mut moved = 0;
    let mut found_word = false;
    for segment in rest.split_word_bounds() {
        if is_word(segment) {
            found_word = true;
        } else if found_word {
            break;
        }
        moved += segment.chars().count();
    }
    offset + moved
}

/// Character offset of the start of the word before `offset`.
fn prev_word_start(text: &str, offset: usize) -> usize {
    let before = &text[..byte_at(text, offset)];
    let mut position = offset;
    let mut found_word = false;
    for segment in before.split_word_bounds().rev() {
        let word = is_word(segment);
        if found_word && !word {
            break;
        }
        found_word |= word;
        position -= segment.chars().count();
    }
    position
}
