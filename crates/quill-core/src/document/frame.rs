//! The document root and its mutation primitives.

use std::cmp::Ordering;
use std::ops::Range;

use slotmap::SlotMap;

use super::node::{byte_offset, Block, BlockId, Span, SpanId};
use super::spot::{Selection, Spot};
use crate::error::{DocumentError, Result};
use crate::logging::targets;
use crate::style::{PropertyMap, StyleSheet};

/// The root of a document: an ordered list of blocks.
///
/// Blocks and spans live in arenas owned by the frame and are addressed by
/// [`BlockId`] and [`SpanId`]. Every content change goes through
/// [`splice`](Self::splice), which keeps the span, block, and frame lengths
/// in step:
///
/// - `frame.len() == sum(block.len())`
/// - `block.len() == sum(span.len())`
/// - `span.len() == span.text().chars().count()`
///
/// # Example
///
/// ```
/// use quill_core::document::Frame;
///
/// let mut frame = Frame::new();
/// let block = frame.insert_block("hello");
/// let span = frame.block(block)?.spans()[0];
/// frame.insert_char(span, 5, '!')?;
/// assert_eq!(frame.plain_text(), "hello!");
/// assert_eq!(frame.len(), 6);
/// # Ok::<(), quill_core::DocumentError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Frame {
    blocks: SlotMap<BlockId, Block>,
    spans: SlotMap<SpanId, Span>,
    order: Vec<BlockId>,
    len: usize,
    styles: StyleSheet,
    style: PropertyMap,
    selection: Option<Selection>,
    dirty: bool,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// Create an empty frame with the built-in named styles.
    pub fn new() -> Self {
        Self {
            blocks: SlotMap::with_key(),
            spans: SlotMap::with_key(),
            order: Vec::new(),
            len: 0,
            styles: StyleSheet::with_defaults(),
            style: PropertyMap::new(),
            selection: None,
            dirty: true,
        }
    }

    /// Create a frame with one block per `'\n'`-separated paragraph.
    pub fn from_text(text: &str) -> Self {
        let mut frame = Self::new();
        for paragraph in text.split('\n') {
            frame.insert_block(paragraph);
        }
        frame
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Total characters in the document.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn block_count(&self) -> usize {
        self.order.len()
    }

    /// Blocks in document order.
    pub fn blocks(&self) -> &[BlockId] {
        &self.order
    }

    pub fn block(&self, block: BlockId) -> Result<&Block> {
        self.blocks.get(block).ok_or(DocumentError::StaleBlock(block))
    }

    pub fn span(&self, span: SpanId) -> Result<&Span> {
        self.spans.get(span).ok_or(DocumentError::StaleSpan(span))
    }

    /// Position of `block` in document order.
    pub fn block_index(&self, block: BlockId) -> Result<usize> {
        self.order
            .iter()
            .position(|&b| b == block)
            .ok_or(DocumentError::StaleBlock(block))
    }

    /// Position of `span` within its block.
    pub fn span_index(&self, span: SpanId) -> Result<usize> {
        let parent = self.span(span)?.block;
        self.block(parent)?
            .spans
            .iter()
            .position(|&s| s == span)
            .ok_or(DocumentError::OrphanSpan(span))
    }

    pub fn block_at(&self, index: usize) -> Option<BlockId> {
        self.order.get(index).copied()
    }

    pub fn first_block(&self) -> Option<BlockId> {
        self.order.first().copied()
    }

    pub fn last_block(&self) -> Option<BlockId> {
        self.order.last().copied()
    }

    pub fn prev_block(&self, block: BlockId) -> Result<Option<BlockId>> {
        let index = self.block_index(block)?;
        Ok(index.checked_sub(1).and_then(|i| self.block_at(i)))
    }

    pub fn next_block(&self, block: BlockId) -> Result<Option<BlockId>> {
        let index = self.block_index(block)?;
        Ok(self.block_at(index + 1))
    }

    /// The previous span in the same block.
    pub fn prev_span(&self, span: SpanId) -> Result<Option<SpanId>> {
        let index = self.span_index(span)?;
        let parent = self.block(self.span(span)?.block)?;
        Ok(index.checked_sub(1).map(|i| parent.spans[i]))
    }

    /// The next span in the same block.
    pub fn next_span(&self, span: SpanId) -> Result<Option<SpanId>> {
        let index = self.span_index(span)?;
        let parent = self.block(self.span(span)?.block)?;
        Ok(parent.spans.get(index + 1).copied())
    }

    pub fn first_span(&self, block: BlockId) -> Result<Option<SpanId>> {
        Ok(self.block(block)?.spans.first().copied())
    }

    pub fn last_span(&self, block: BlockId) -> Result<Option<SpanId>> {
        Ok(self.block(block)?.spans.last().copied())
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Append a block holding a single span with `text`.
    pub fn insert_block(&mut self, text: &str) -> BlockId {
        let block = self.blocks.insert(Block::default());
        self.order.push(block);
        self.attach_new_span(block, 0, text);
        block
    }

    /// Insert a block holding a single span with `text` at `index`.
    pub fn insert_block_at(&mut self, index: usize, text: &str) -> Result<BlockId> {
        let block = self.insert_empty_block_at(index)?;
        self.attach_new_span(block, 0, text);
        Ok(block)
    }

    /// Insert a block with no spans at `index`.
    ///
    /// The block must receive at least one span before the next layout.
    pub fn insert_empty_block_at(&mut self, index: usize) -> Result<BlockId> {
        if index > self.order.len() {
            return Err(DocumentError::IndexOutOfBounds {
                index,
                len: self.order.len(),
            });
        }
        let block = self.blocks.insert(Block::default());
        self.order.insert(index, block);
        self.dirty = true;
        tracing::trace!(target: targets::DOCUMENT, ?block, index, "inserted block");
        Ok(block)
    }

    /// Remove an empty block.
    ///
    /// Fails with [`DocumentError::BlockNotEmpty`] if the block still has
    /// characters or spans.
    pub fn remove_block(&mut self, block: BlockId) -> Result<()> {
        let node = self.block(block)?;
        if node.len > 0 || !node.spans.is_empty() {
            return Err(DocumentError::BlockNotEmpty {
                block,
                len: node.len,
                spans: node.spans.len(),
            });
        }
        let index = self.block_index(block)?;
        self.order.remove(index);
        self.blocks.remove(block);
        self.dirty = true;
        tracing::trace!(target: targets::DOCUMENT, ?block, "removed block");
        Ok(())
    }

    /// Append a new span to `block`.
    pub fn insert_span(&mut self, block: BlockId, text: &str) -> Result<SpanId> {
        let count = self.block(block)?.spans.len();
        Ok(self.attach_new_span(block, count, text))
    }

    /// Insert a new span into `block` at `index`.
    pub fn insert_span_at(&mut self, block: BlockId, index: usize, text: &str) -> Result<SpanId> {
        let count = self.block(block)?.spans.len();
        if index > count {
            return Err(DocumentError::IndexOutOfBounds { index, len: count });
        }
        Ok(self.attach_new_span(block, index, text))
    }

    /// Detach and destroy a span, returning its text.
    ///
    /// An active selection touching the span is cleared.
    pub fn remove_span(&mut self, span: SpanId) -> Result<String> {
        let index = self.span_index(span)?;
        let node = self.spans.remove(span).ok_or(DocumentError::StaleSpan(span))?;
        let parent = self
            .blocks
            .get_mut(node.block)
            .ok_or(DocumentError::StaleBlock(node.block))?;
        parent.spans.remove(index);
        parent.len -= node.len;
        self.len -= node.len;
        self.dirty = true;

        if self
            .selection
            .is_some_and(|sel| sel.start.span == span || sel.end.span == span)
        {
            self.selection = None;
        }
        Ok(node.text)
    }

    /// Move a span, possibly from another block, to the end of `block`.
    pub fn append_span(&mut self, block: BlockId, span: SpanId) -> Result<()> {
        let current = self.span(span)?.block;
        let mut count = self.block(block)?.spans.len();
        if current == block {
            count -= 1;
        }
        self.move_span(span, block, count)
    }

    /// Move a span to position `index` of `block`.
    ///
    /// The index is interpreted after the span is detached from its current
    /// parent. Lengths move with the span.
    pub fn move_span(&mut self, span: SpanId, block: BlockId, index: usize) -> Result<()> {
        let old_index = self.span_index(span)?;
        let (old_block, len) = {
            let node = self.span(span)?;
            (node.block, node.len)
        };
        let mut limit = self.block(block)?.spans.len();
        if old_block == block {
            limit -= 1;
        }
        if index > limit {
            return Err(DocumentError::IndexOutOfBounds { index, len: limit });
        }

        let source = self
            .blocks
            .get_mut(old_block)
            .ok_or(DocumentError::StaleBlock(old_block))?;
        source.spans.remove(old_index);
        source.len -= len;

        let target = self
            .blocks
            .get_mut(block)
            .ok_or(DocumentError::StaleBlock(block))?;
        target.spans.insert(index, span);
        target.len += len;

        if let Some(node) = self.spans.get_mut(span) {
            node.block = block;
        }
        self.dirty = true;
        Ok(())
    }

    fn attach_new_span(&mut self, block: BlockId, index: usize, text: &str) -> SpanId {
        let span = self.spans.insert(Span::new(block, text));
        let len = self.spans[span].len;
        if let Some(parent) = self.blocks.get_mut(block) {
            parent.spans.insert(index, span);
            parent.len += len;
        }
        self.len += len;
        self.dirty = true;
        span
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Replace the characters in `range` of `span` with `replacement`.
    ///
    /// This is the single content mutation path. Span, block, and frame
    /// lengths are updated together and the frame is marked dirty. Returns
    /// the removed text.
    pub fn splice(
        &mut self,
        span: SpanId,
        range: Range<usize>,
        replacement: &str,
    ) -> Result<String> {
        let (block, len) = {
            let node = self.span(span)?;
            (node.block, node.len)
        };
        if range.start > range.end || range.end > len {
            return Err(DocumentError::InsetOutOfBounds {
                inset: range.start.max(range.end),
                len,
            });
        }
        if !self.blocks.contains_key(block) {
            return Err(DocumentError::StaleBlock(block));
        }

        let removed_len = range.end - range.start;
        let added_len = replacement.chars().count();

        let node = &mut self.spans[span];
        let from = byte_offset(&node.text, range.start);
        let to = byte_offset(&node.text, range.end);
        let removed = node.text[from..to].to_string();
        node.text.replace_range(from..to, replacement);
        node.len = node.len - removed_len + added_len;

        let parent = &mut self.blocks[block];
        parent.len = parent.len - removed_len + added_len;
        self.len = self.len - removed_len + added_len;
        self.dirty = true;
        Ok(removed)
    }

    /// Replace the full content of a span.
    pub fn set_string(&mut self, span: SpanId, text: &str) -> Result<()> {
        let len = self.span(span)?.len;
        self.splice(span, 0..len, text).map(|_| ())
    }

    /// Insert one character at character offset `index`.
    pub fn insert_char(&mut self, span: SpanId, index: usize, ch: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.insert_str(span, index, ch.encode_utf8(&mut buf))
    }

    /// Insert a string at character offset `index`.
    pub fn insert_str(&mut self, span: SpanId, index: usize, text: &str) -> Result<()> {
        self.splice(span, index..index, text).map(|_| ())
    }

    /// Remove a character range, returning the removed text.
    pub fn remove_range(&mut self, span: SpanId, range: Range<usize>) -> Result<String> {
        self.splice(span, range, "")
    }

    // =========================================================================
    // Dirty tracking
    // =========================================================================

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Whether the document changed since the last [`clear_dirty`](Self::clear_dirty).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // =========================================================================
    // Styles
    // =========================================================================

    /// The named style table.
    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut StyleSheet {
        self.dirty = true;
        &mut self.styles
    }

    /// The frame's own inline defaults.
    pub fn style(&self) -> &PropertyMap {
        &self.style
    }

    pub fn frame_style_mut(&mut self) -> &mut PropertyMap {
        self.dirty = true;
        &mut self.style
    }

    pub fn set_block_stylename(&mut self, block: BlockId, name: Option<&str>) -> Result<()> {
        let node = self
            .blocks
            .get_mut(block)
            .ok_or(DocumentError::StaleBlock(block))?;
        node.stylename = name.map(str::to_string);
        self.dirty = true;
        Ok(())
    }

    pub fn set_span_stylename(&mut self, span: SpanId, name: Option<&str>) -> Result<()> {
        let node = self
            .spans
            .get_mut(span)
            .ok_or(DocumentError::StaleSpan(span))?;
        node.stylename = name.map(str::to_string);
        self.dirty = true;
        Ok(())
    }

    pub fn block_style_mut(&mut self, block: BlockId) -> Result<&mut PropertyMap> {
        self.dirty = true;
        self.blocks
            .get_mut(block)
            .map(|node| &mut node.style)
            .ok_or(DocumentError::StaleBlock(block))
    }

    pub fn span_style_mut(&mut self, span: SpanId) -> Result<&mut PropertyMap> {
        self.dirty = true;
        self.spans
            .get_mut(span)
            .map(|node| &mut node.style)
            .ok_or(DocumentError::StaleSpan(span))
    }

    /// Copy stylename and inline style from one span to another.
    pub fn copy_span_style(&mut self, from: SpanId, to: SpanId) -> Result<()> {
        let (stylename, style) = {
            let node = self.span(from)?;
            (node.stylename.clone(), node.style.clone())
        };
        let target = self.spans.get_mut(to).ok_or(DocumentError::StaleSpan(to))?;
        target.stylename = stylename;
        target.style = style;
        self.dirty = true;
        Ok(())
    }

    /// Copy stylename and inline style from one block to another.
    pub fn copy_block_style(&mut self, from: BlockId, to: BlockId) -> Result<()> {
        let (stylename, style) = {
            let node = self.block(from)?;
            (node.stylename.clone(), node.style.clone())
        };
        let target = self.blocks.get_mut(to).ok_or(DocumentError::StaleBlock(to))?;
        target.stylename = stylename;
        target.style = style;
        self.dirty = true;
        Ok(())
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Set the active selection. Both ends must be valid spots.
    pub fn set_selection(&mut self, selection: Selection) -> Result<()> {
        self.validate_spot(selection.start)?;
        self.validate_spot(selection.end)?;
        self.selection = Some(selection);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // =========================================================================
    // Text
    // =========================================================================

    /// All span text in block order, with no separators.
    pub fn plain_text(&self) -> String {
        let mut out = String::with_capacity(self.len);
        for block in &self.order {
            if let Some(node) = self.blocks.get(*block) {
                for span in &node.spans {
                    if let Some(s) = self.spans.get(*span) {
                        out.push_str(&s.text);
                    }
                }
            }
        }
        out
    }

    /// Text of one block.
    pub fn block_text(&self, block: BlockId) -> Result<String> {
        let node = self.block(block)?;
        let mut out = String::with_capacity(node.len);
        for span in &node.spans {
            out.push_str(&self.span(*span)?.text);
        }
        Ok(out)
    }

    /// Text covered by a selection, with `'\n'` between blocks.
    pub fn text_in(&self, selection: &Selection) -> Result<String> {
        let (start, end) = selection.ordered(self)?;
        let first = self.block_index(start.block)?;
        let last = self.block_index(end.block)?;
        let mut out = String::new();

        for index in first..=last {
            let block = self.order[index];
            let text = self.block_text(block)?;
            let from = if index == first { self.block_offset(start)? } else { 0 };
            let to = if index == last {
                self.block_offset(end)?
            } else {
                self.block(block)?.len
            };
            let a = byte_offset(&text, from);
            let b = byte_offset(&text, to.max(from));
            out.push_str(&text[a..b]);
            if index != last {
                out.push('\n');
            }
        }
        Ok(out)
    }

    // =========================================================================
    // Positions
    // =========================================================================

    /// Check that a spot references a live span of its block and a valid inset.
    pub fn validate_spot(&self, spot: Spot) -> Result<()> {
        let span = self.span(spot.span)?;
        self.block(spot.block)?;
        if span.block != spot.block {
            return Err(DocumentError::SpanNotInBlock {
                span: spot.span,
                block: spot.block,
            });
        }
        if spot.inset > span.len {
            return Err(DocumentError::InsetOutOfBounds {
                inset: spot.inset,
                len: span.len,
            });
        }
        Ok(())
    }

    /// Character offset of a spot from the start of its block.
    pub fn block_offset(&self, spot: Spot) -> Result<usize> {
        self.validate_spot(spot)?;
        let mut offset = 0;
        for span in &self.block(spot.block)?.spans {
            if *span == spot.span {
                return Ok(offset + spot.inset);
            }
            offset += self.span(*span)?.len;
        }
        Err(DocumentError::OrphanSpan(spot.span))
    }

    /// The spot at a block-relative offset.
    ///
    /// An offset on a span boundary resolves to the end of the earlier span.
    pub fn spot_at(&self, block: BlockId, offset: usize) -> Result<Spot> {
        let node = self.block(block)?;
        if offset > node.len || node.spans.is_empty() {
            return Err(DocumentError::IndexOutOfBounds {
                index: offset,
                len: node.len,
            });
        }
        let mut remaining = offset;
        for span in &node.spans {
            let len = self.span(*span)?.len;
            if remaining <= len {
                return Ok(Spot::new(block, *span, remaining));
            }
            remaining -= len;
        }
        Err(DocumentError::length_mismatch(
            format!("block {block:?}"),
            node.len,
            offset - remaining,
        ))
    }

    /// First position of the document.
    pub fn start_spot(&self) -> Option<Spot> {
        let block = self.first_block()?;
        let span = *self.blocks.get(block)?.spans.first()?;
        Some(Spot::new(block, span, 0))
    }

    /// Last position of the document.
    pub fn end_spot(&self) -> Option<Spot> {
        let block = self.last_block()?;
        let span = *self.blocks.get(block)?.spans.last()?;
        Some(Spot::new(block, span, self.spans.get(span)?.len))
    }

    /// Compare two spots in document order.
    ///
    /// The end of one span and the start of the next compare equal.
    pub fn compare_spots(&self, a: Spot, b: Spot) -> Result<Ordering> {
        let key_a = (self.block_index(a.block)?, self.block_offset(a)?);
        let key_b = (self.block_index(b.block)?, self.block_offset(b)?);
        Ok(key_a.cmp(&key_b))
    }

    // =========================================================================
    // Invariants
    // =========================================================================

    /// Verify every length invariant and parent link.
    pub fn check_invariants(&self) -> Result<()> {
        let mut total = 0;
        let mut listed = 0;
        for block in &self.order {
            let node = self.block(*block)?;
            let mut block_len = 0;
            for span in &node.spans {
                let s = self.span(*span)?;
                if s.block != *block {
                    return Err(DocumentError::OrphanSpan(*span));
                }
                let actual = s.text.chars().count();
                if s.len != actual {
                    return Err(DocumentError::length_mismatch(
                        format!("span {span:?}"),
                        s.len,
                        actual,
                    ));
                }
                block_len += s.len;
                listed += 1;
            }
            if node.len != block_len {
                return Err(DocumentError::length_mismatch(
                    format!("block {block:?}"),
                    node.len,
                    block_len,
                ));
            }
            total += block_len;
        }
        if self.len != total {
            return Err(DocumentError::length_mismatch("frame", self.len, total));
        }
        if self.blocks.len() != self.order.len() {
            return Err(DocumentError::length_mismatch(
                "frame block list",
                self.order.len(),
                self.blocks.len(),
            ));
        }
        if listed != self.spans.len() {
            if let Some((span, _)) = self
                .spans
                .iter()
                .find(|(id, s)| !self.blocks.get(s.block).is_some_and(|b| b.spans.contains(id)))
            {
                return Err(DocumentError::OrphanSpan(span));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Frame, BlockId, SpanId) {
        let mut frame = Frame::new();
        let block = frame.insert_block("hello");
        let span = frame.first_span(block).unwrap().unwrap();
        (frame, block, span)
    }

    #[test]
    fn test_insert_block_creates_span() {
        let (frame, block, span) = setup();
        assert_eq!(frame.len(), 5);
        assert_eq!(frame.block(block).unwrap().len(), 5);
        assert_eq!(frame.span(span).unwrap().text(), "hello");
        assert_eq!(frame.span(span).unwrap().block(), block);
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_char_propagates() {
        let (mut frame, block, span) = setup();
        frame.clear_dirty();
        frame.insert_char(span, 0, 'X').unwrap();
        assert_eq!(frame.plain_text(), "Xhello");
        assert_eq!(frame.len(), 6);
        assert_eq!(frame.block(block).unwrap().len(), 6);
        assert!(frame.is_dirty());
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_set_string_propagates_delta() {
        let (mut frame, block, span) = setup();
        let other = frame.insert_span(block, " world").unwrap();
        frame.set_string(span, "hi").unwrap();
        assert_eq!(frame.len(), 8);
        assert_eq!(frame.block(block).unwrap().len(), 8);
        frame.set_string(other, "").unwrap();
        assert_eq!(frame.len(), 2);
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_splice_out_of_bounds() {
        let (mut frame, _, span) = setup();
        let err = frame.remove_range(span, 3..9).unwrap_err();
        assert_eq!(err, DocumentError::InsetOutOfBounds { inset: 9, len: 5 });
        assert_eq!(frame.plain_text(), "hello");
    }

    #[test]
    fn test_insert_delete_round_trip() {
        let (mut frame, _, span) = setup();
        frame.insert_str(span, 2, "ÿÿ").unwrap();
        assert_eq!(frame.plain_text(), "heÿÿllo");
        let removed = frame.remove_range(span, 2..4).unwrap();
        assert_eq!(removed, "ÿÿ");
        assert_eq!(frame.plain_text(), "hello");
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_block_requires_empty() {
        let (mut frame, block, span) = setup();
        assert!(matches!(
            frame.remove_block(block),
            Err(DocumentError::BlockNotEmpty { len: 5, spans: 1, .. })
        ));

        frame.set_string(span, "").unwrap();
        // Still holds a span.
        assert!(frame.remove_block(block).is_err());

        frame.remove_span(span).unwrap();
        frame.remove_block(block).unwrap();
        assert_eq!(frame.block_count(), 0);
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_span_updates_lengths() {
        let (mut frame, block, _) = setup();
        let extra = frame.insert_span(block, "abc").unwrap();
        assert_eq!(frame.len(), 8);
        assert_eq!(frame.remove_span(extra).unwrap(), "abc");
        assert_eq!(frame.len(), 5);
        assert!(matches!(frame.span(extra), Err(DocumentError::StaleSpan(_))));
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_move_span_between_blocks() {
        let (mut frame, first, span) = setup();
        let second = frame.insert_block("world");
        frame.append_span(second, span).unwrap();
        assert_eq!(frame.block(first).unwrap().len(), 0);
        assert_eq!(frame.block(second).unwrap().len(), 10);
        assert_eq!(frame.block_text(second).unwrap(), "worldhello");
        assert_eq!(frame.span(span).unwrap().block(), second);
        frame.check_invariants().unwrap();

        frame.move_span(span, second, 0).unwrap();
        assert_eq!(frame.block_text(second).unwrap(), "helloworld");
        assert!(frame.move_span(span, first, 1).is_err());
    }

    #[test]
    fn test_insert_block_at_bounds() {
        let (mut frame, first, _) = setup();
        let b = frame.insert_block_at(0, "top").unwrap();
        assert_eq!(frame.blocks(), &[b, first]);
        assert!(frame.insert_block_at(5, "x").is_err());
        assert_eq!(frame.plain_text(), "tophello");
    }

    #[test]
    fn test_navigation() {
        let (mut frame, first, span) = setup();
        let second_span = frame.insert_span(first, "!").unwrap();
        let second = frame.insert_block("b");

        assert_eq!(frame.next_span(span).unwrap(), Some(second_span));
        assert_eq!(frame.prev_span(span).unwrap(), None);
        assert_eq!(frame.next_block(first).unwrap(), Some(second));
        assert_eq!(frame.prev_block(first).unwrap(), None);
        assert_eq!(frame.span_index(second_span).unwrap(), 1);
    }

    #[test]
    fn test_block_offset_and_spot_at() {
        let (mut frame, block, span) = setup();
        let tail = frame.insert_span(block, "abc").unwrap();
        let spot = Spot::new(block, tail, 2);
        assert_eq!(frame.block_offset(spot).unwrap(), 7);
        assert_eq!(frame.spot_at(block, 7).unwrap(), spot);
        assert_eq!(frame.spot_at(block, 5).unwrap(), Spot::new(block, span, 5));
        assert!(frame.spot_at(block, 9).is_err());
    }

    #[test]
    fn test_compare_spots() {
        let mut frame = Frame::from_text("ab\ncd");
        let a = frame.start_spot().unwrap();
        let b = frame.end_spot().unwrap();
        assert_eq!(frame.compare_spots(a, b).unwrap(), Ordering::Less);
        assert_eq!(frame.compare_spots(b, a).unwrap(), Ordering::Greater);

        let block = a.block;
        let next = frame.insert_span(block, "zz").unwrap();
        let end_of_first = a.with_inset(2);
        let start_of_next = Spot::new(block, next, 0);
        assert_eq!(
            frame.compare_spots(end_of_first, start_of_next).unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn test_text_in_selection() {
        let frame = Frame::from_text("AAA\nBBB\nCCC");
        let blocks = frame.blocks().to_vec();
        let s0 = frame.first_span(blocks[0]).unwrap().unwrap();
        let s2 = frame.first_span(blocks[2]).unwrap().unwrap();
        let sel = Selection::new(Spot::new(blocks[2], s2, 2), Spot::new(blocks[0], s0, 1));
        assert_eq!(frame.text_in(&sel).unwrap(), "AA\nBBB\nCC");
    }

    #[test]
    fn test_validate_spot() {
        let (mut frame, block, span) = setup();
        let other = frame.insert_block("x");
        assert!(frame.validate_spot(Spot::new(block, span, 5)).is_ok());
        assert!(matches!(
            frame.validate_spot(Spot::new(block, span, 6)),
            Err(DocumentError::InsetOutOfBounds { .. })
        ));
        assert!(matches!(
            frame.validate_spot(Spot::new(other, span, 0)),
            Err(DocumentError::SpanNotInBlock { .. })
        ));
    }

    #[test]
    fn test_remove_span_clears_touching_selection() {
        let (mut frame, block, span) = setup();
        let extra = frame.insert_span(block, "abc").unwrap();
        frame
            .set_selection(Selection::new(Spot::new(block, span, 0), Spot::new(block, extra, 1)))
            .unwrap();
        frame.remove_span(extra).unwrap();
        assert!(frame.selection().is_none());
    }
}
