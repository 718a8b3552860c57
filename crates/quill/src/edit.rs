//! Structural editing operations.
//!
//! Every function here takes the frame and a position, performs one edit
//! through the frame's mutation API, and returns where the caret belongs
//! afterwards. Lengths stay consistent after each step.

use std::cmp::Ordering;

use quill_core::document::{BlockId, Frame, Selection, SpanId, Spot};
use quill_core::logging::targets;

use crate::error::Result;

/// Insert one character at `spot`, returning the spot after it.
pub fn insert_char(frame: &mut Frame, spot: Spot, ch: char) -> Result<Spot> {
    frame.insert_char(spot.span, spot.inset, ch)?;
    Ok(spot.with_inset(spot.inset + 1))
}

/// Insert text at `spot`, returning the spot after it.
///
/// Each `'\n'` in `text` splits the block.
pub fn insert_text(frame: &mut Frame, spot: Spot, text: &str) -> Result<Spot> {
    let mut spot = spot;
    for (i, part) in text.split('\n').enumerate() {
        if i > 0 {
            spot = split_block(frame, spot)?;
        }
        if !part.is_empty() {
            frame.insert_str(spot.span, spot.inset, part)?;
            spot = spot.with_inset(spot.inset + part.chars().count());
        }
    }
    Ok(spot)
}

/// Delete the character before `spot`.
///
/// At the start of a block the block merges into the previous one and the
/// caret lands on the merge point. Returns `None` at the document start.
pub fn delete_backward(frame: &mut Frame, spot: Spot) -> Result<Option<Spot>> {
    if spot.inset > 0 {
        frame.remove_range(spot.span, spot.inset - 1..spot.inset)?;
        return Ok(Some(spot.with_inset(spot.inset - 1)));
    }

    let mut prev = frame.prev_span(spot.span)?;
    while let Some(span) = prev {
        let len = frame.span(span)?.len();
        if len > 0 {
            frame.remove_range(span, len - 1..len)?;
            return Ok(Some(Spot::new(spot.block, span, len - 1)));
        }
        prev = frame.prev_span(span)?;
    }

    let Some(above) = frame.prev_block(spot.block)? else {
        return Ok(None);
    };
    let Some(last) = frame.last_span(above)? else {
        return Ok(None);
    };
    let merge_point = Spot::new(above, last, frame.span(last)?.len());
    merge_blocks(frame, above, spot.block)?;
    Ok(Some(merge_point))
}

/// Delete the character after `spot`.
///
/// At the end of a block the next block merges into this one. The caret
/// does not move. Returns `None` at the document end.
pub fn delete_forward(frame: &mut Frame, spot: Spot) -> Result<Option<Spot>> {
    let len = frame.span(spot.span)?.len();
    if spot.inset < len {
        frame.remove_range(spot.span, spot.inset..spot.inset + 1)?;
        return Ok(Some(spot));
    }

    let mut next = frame.next_span(spot.span)?;
    while let Some(span) = next {
        if frame.span(span)?.len() > 0 {
            frame.remove_range(span, 0..1)?;
            return Ok(Some(spot));
        }
        next = frame.next_span(span)?;
    }

    let Some(below) = frame.next_block(spot.block)? else {
        return Ok(None);
    };
    merge_blocks(frame, spot.block, below)?;
    Ok(Some(spot))
}

/// Move every span of `from` to the end of `into` and remove `from`.
fn merge_blocks(frame: &mut Frame, into: BlockId, from: BlockId) -> Result<()> {
    let spans = frame.block(from)?.spans().to_vec();
    for span in spans {
        frame.append_span(into, span)?;
    }
    frame.remove_block(from)?;
    tracing::trace!(target: targets::EDIT, ?into, ?from, "merged blocks");
    Ok(())
}

/// Delete the selected text, returning the selection's start.
///
/// The selection may be in either order. Blocks between the two ends are
/// removed and the end block's remainder joins the start block. The
/// frame's selection is cleared.
pub fn remove_selection(frame: &mut Frame, selection: Selection) -> Result<Spot> {
    let (start, end) = selection.ordered(frame)?;
    frame.clear_selection();
    if frame.compare_spots(start, end)? == Ordering::Equal {
        return Ok(start);
    }

    if start.span == end.span {
        frame.remove_range(start.span, start.inset..end.inset)?;
    } else {
        let start_len = frame.span(start.span)?.len();
        frame.remove_range(start.span, start.inset..start_len)?;
        frame.remove_range(end.span, 0..end.inset)?;

        if start.block == end.block {
            let spans = frame.block(start.block)?.spans().to_vec();
            let from = frame.span_index(start.span)? + 1;
            let to = frame.span_index(end.span)?;
            for span in spans.get(from..to).unwrap_or_default() {
                frame.remove_span(*span)?;
            }
        } else {
            let trailing = frame.block(start.block)?.spans().to_vec();
            let from = frame.span_index(start.span)? + 1;
            for span in trailing.get(from..).unwrap_or_default() {
                frame.remove_span(*span)?;
            }

            let leading = frame.block(end.block)?.spans().to_vec();
            let to = frame.span_index(end.span)?;
            for span in leading.get(..to).unwrap_or_default() {
                frame.remove_span(*span)?;
            }

            let first = frame.block_index(start.block)?;
            let last = frame.block_index(end.block)?;
            let between = frame.blocks()[first + 1..last].to_vec();
            for block in between {
                for span in frame.block(block)?.spans().to_vec() {
                    frame.remove_span(span)?;
                }
                frame.remove_block(block)?;
            }

            merge_blocks(frame, start.block, end.block)?;
        }
    }

    tracing::debug!(target: targets::EDIT, len = frame.len(), "removed selection");
    Ok(start)
}

/// Split the span at `spot.inset`, returning the new right half.
///
/// The right half copies the span's style name and inline style.
pub fn split_span_with_inset(frame: &mut Frame, spot: Spot) -> Result<SpanId> {
    frame.validate_spot(spot)?;
    let index = frame.span_index(spot.span)?;
    let len = frame.span(spot.span)?.len();
    let right = frame.insert_span_at(spot.block, index + 1, "")?;
    frame.copy_span_style(spot.span, right)?;
    let tail = frame.remove_range(spot.span, spot.inset..len)?;
    frame.insert_str(right, 0, &tail)?;
    Ok(right)
}

/// Split the block at `spot`, returning the start of the new block.
///
/// The new block follows the current one, copies its style, and takes
/// every span after the split point.
pub fn split_block(frame: &mut Frame, spot: Spot) -> Result<Spot> {
    let right = split_span_with_inset(frame, spot)?;
    let index = frame.block_index(spot.block)?;
    let block = frame.insert_empty_block_at(index + 1)?;
    frame.copy_block_style(spot.block, block)?;

    let from = frame.span_index(right)?;
    let moving = frame.block(spot.block)?.spans()[from..].to_vec();
    for span in moving {
        frame.append_span(block, span)?;
    }
    tracing::trace!(target: targets::EDIT, ?block, "split block");
    Ok(Spot::new(block, right, 0))
}

/// Split spans so the selection's interior is a run of whole spans.
///
/// Returns the ordered boundary spots. The start lands at inset 0 of the
/// first selected span and the end at the full length of the last.
pub fn split_span_with_selection(frame: &mut Frame, selection: Selection) -> Result<(Spot, Spot)> {
    let (mut start, mut end) = selection.ordered(frame)?;

    let end_len = frame.span(end.span)?.len();
    if end.inset > 0 && end.inset < end_len {
        split_span_with_inset(frame, end)?;
    }

    let start_len = frame.span(start.span)?.len();
    if start.inset > 0 && start.inset < start_len {
        let right = split_span_with_inset(frame, start)?;
        if end.span == start.span {
            end = Spot::new(end.block, right, end.inset - start.inset);
        }
        start = Spot::new(start.block, right, 0);
    }
    Ok((start, end))
}

/// Spans fully covered by a carved range.
fn covered_spans(frame: &Frame, start: Spot, end: Spot) -> Result<Vec<SpanId>> {
    let first = frame.block_index(start.block)?;
    let last = frame.block_index(end.block)?;
    let mut covered = Vec::new();

    for index in first..=last {
        let block = frame.blocks()[index];
        let spans = frame.block(block)?.spans();
        let from = if index == first { frame.span_index(start.span)? } else { 0 };
        let to = if index == last {
            frame.span_index(end.span)?
        } else {
            spans.len().saturating_sub(1)
        };
        for span in spans.get(from..=to).unwrap_or_default() {
            let len = frame.span(*span)?.len();
            let begin = if *span == start.span { start.inset } else { 0 };
            let finish = if *span == end.span { end.inset } else { len };
            let inner = *span != start.span && *span != end.span;
            if begin < finish || (inner && begin == 0 && finish == len) {
                covered.push(*span);
            }
        }
    }
    Ok(covered)
}

/// Set the style name of every span inside `selection`.
///
/// `None` clears the style name. Returns the carved selection, which also
/// becomes the frame's selection.
pub fn apply_style(
    frame: &mut Frame,
    selection: Selection,
    stylename: Option<&str>,
) -> Result<Selection> {
    let (start, end) = split_span_with_selection(frame, selection)?;
    let spans = covered_spans(frame, start, end)?;
    for span in &spans {
        frame.set_span_stylename(*span, stylename)?;
    }
    tracing::debug!(target: targets::EDIT, stylename, spans = spans.len(), "applied style");

    let carved = Selection::new(start, end);
    frame.set_selection(carved)?;
    Ok(carved)
}

/// Style the word fragment that ends at the caret.
///
/// The fragment runs from the last whitespace before `spot` (within its
/// span) to `spot`. It becomes its own span with `stylename`, and the
/// returned caret sits at that span's end. With no fragment, an empty
/// styled span is inserted at the caret instead.
pub fn style_word_before(frame: &mut Frame, spot: Spot, stylename: Option<&str>) -> Result<Spot> {
    frame.validate_spot(spot)?;
    let span = frame.span(spot.span)?;
    let before: Vec<char> = span.slice(0, spot.inset).chars().collect();
    let fragment_start = before
        .iter()
        .rposition(|ch| ch.is_whitespace())
        .map_or(0, |i| i + 1);
    let len = span.len();

    if spot.inset > 0 && spot.inset < len {
        split_span_with_inset(frame, spot)?;
    }

    if fragment_start == spot.inset {
        let index = frame.span_index(spot.span)?;
        let at = if spot.inset == 0 { index } else { index + 1 };
        let styled = frame.insert_span_at(spot.block, at, "")?;
        frame.copy_span_style(spot.span, styled)?;
        frame.set_span_stylename(styled, stylename)?;
        return Ok(Spot::new(spot.block, styled, 0));
    }

    let styled = if fragment_start > 0 {
        split_span_with_inset(frame, spot.with_inset(fragment_start))?
    } else {
        spot.span
    };
    frame.set_span_stylename(styled, stylename)?;
    let styled_len = frame.span(styled)?.len();
    Ok(Spot::new(spot.block, styled, styled_len))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(text: &str) -> Frame {
        Frame::from_text(text)
    }

    fn spot(frame: &Frame, block: usize, offset: usize) -> Spot {
        frame.spot_at(frame.blocks()[block], offset).unwrap()
    }

    fn span_texts(frame: &Frame, block: usize) -> Vec<(String, Option<String>)> {
        let block = frame.block(frame.blocks()[block]).unwrap();
        block
            .spans()
            .iter()
            .map(|s| {
                let span = frame.span(*s).unwrap();
                (span.text().to_string(), span.stylename().map(str::to_string))
            })
            .collect()
    }

    #[test]
    fn test_insert_text_splits_on_newline() {
        let mut frame = setup("ad");
        let at = spot(&frame, 0, 1);
        let at = insert_text(&mut frame, at, "b\nc").unwrap();
        assert_eq!(frame.block_count(), 2);
        assert_eq!(frame.block_text(frame.blocks()[0]).unwrap(), "ab");
        assert_eq!(frame.block_text(frame.blocks()[1]).unwrap(), "cd");
        assert_eq!(frame.block_offset(at).unwrap(), 1);
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_delete_inside_span() {
        let mut frame = setup("abc");
        let at = spot(&frame, 0, 2);
        let at = delete_backward(&mut frame, at).unwrap().unwrap();
        assert_eq!(frame.plain_text(), "ac");
        assert_eq!(at.inset, 1);

        let at = delete_forward(&mut frame, at).unwrap().unwrap();
        assert_eq!(frame.plain_text(), "a");
        assert_eq!(at.inset, 1);
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_delete_at_span_boundary() {
        let mut frame = setup("ab");
        let block = frame.blocks()[0];
        let second = frame.insert_span(block, "cd").unwrap();

        let at = delete_backward(&mut frame, Spot::new(block, second, 0)).unwrap().unwrap();
        assert_eq!(frame.plain_text(), "acd");
        assert_eq!(frame.block_offset(at).unwrap(), 1);

        let at = delete_forward(&mut frame, at).unwrap().unwrap();
        assert_eq!(frame.plain_text(), "ad");
        assert_eq!(frame.block_offset(at).unwrap(), 1);
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_delete_merges_blocks() {
        let mut frame = setup("ab\ncd");
        let at = spot(&frame, 1, 0);
        let at = delete_backward(&mut frame, at).unwrap().unwrap();
        assert_eq!(frame.block_count(), 1);
        assert_eq!(frame.plain_text(), "abcd");
        assert_eq!(frame.block_offset(at).unwrap(), 2);

        let mut frame = setup("ab\ncd");
        let at = spot(&frame, 0, 2);
        let at = delete_forward(&mut frame, at).unwrap().unwrap();
        assert_eq!(frame.block_count(), 1);
        assert_eq!(frame.plain_text(), "abcd");
        assert_eq!(frame.block_offset(at).unwrap(), 2);
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_delete_at_document_edges() {
        let mut frame = setup("ab");
        let (start, end) = (spot(&frame, 0, 0), spot(&frame, 0, 2));
        assert_eq!(delete_backward(&mut frame, start).unwrap(), None);
        assert_eq!(delete_forward(&mut frame, end).unwrap(), None);
        assert_eq!(frame.plain_text(), "ab");
    }

    #[test]
    fn test_remove_selection_same_span() {
        let mut frame = setup("abcdef");
        let sel = Selection::new(spot(&frame, 0, 4), spot(&frame, 0, 1));
        let at = remove_selection(&mut frame, sel).unwrap();
        assert_eq!(frame.plain_text(), "aef");
        assert_eq!(at.inset, 1);
    }

    #[test]
    fn test_remove_selection_same_block() {
        let mut frame = setup("ab");
        let block = frame.blocks()[0];
        frame.insert_span(block, "cd").unwrap();
        let last = frame.insert_span(block, "ef").unwrap();
        let sel = Selection::new(spot(&frame, 0, 1), Spot::new(block, last, 1));
        remove_selection(&mut frame, sel).unwrap();
        assert_eq!(frame.plain_text(), "af");
        assert_eq!(frame.block(block).unwrap().spans().len(), 2);
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_selection_across_blocks() {
        let mut frame = setup("AAA\nBBB\nCCC");
        frame
            .set_selection(Selection::new(spot(&frame, 0, 1), spot(&frame, 2, 2)))
            .unwrap();
        let sel = frame.selection().unwrap();
        let at = remove_selection(&mut frame, sel).unwrap();
        assert_eq!(frame.plain_text(), "AC");
        assert_eq!(frame.block_count(), 1);
        assert_eq!(frame.block_index(at.block).unwrap(), 0);
        assert_eq!(frame.block_offset(at).unwrap(), 1);
        assert_eq!(frame.selection(), None);
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_split_block_copies_style() {
        let mut frame = setup("hello");
        let block = frame.blocks()[0];
        frame.set_block_stylename(block, Some("heading")).unwrap();
        let first = frame.first_span(block).unwrap().unwrap();
        frame.set_span_stylename(first, Some("bold")).unwrap();

        let at = spot(&frame, 0, 2);

        let at = split_block(&mut frame, at).unwrap();
        assert_eq!(frame.block_count(), 2);
        assert_eq!(at.inset, 0);
        assert_eq!(frame.block_text(frame.blocks()[1]).unwrap(), "llo");
        assert_eq!(frame.block(at.block).unwrap().stylename(), Some("heading"));
        assert_eq!(frame.span(at.span).unwrap().stylename(), Some("bold"));
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_split_then_delete_round_trip() {
        let mut frame = setup("hello world");
        let at = spot(&frame, 0, 5);
        let at = split_block(&mut frame, at).unwrap();
        let back = delete_backward(&mut frame, at).unwrap().unwrap();
        assert_eq!(frame.plain_text(), "hello world");
        assert_eq!(frame.block_count(), 1);
        assert_eq!(frame.block_offset(back).unwrap(), 5);
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_split_span_with_selection_inside_one_span() {
        let mut frame = setup("abcdef");
        let sel = Selection::new(spot(&frame, 0, 4), spot(&frame, 0, 2));
        let (start, end) = split_span_with_selection(&mut frame, sel).unwrap();
        assert_eq!(start.span, end.span);
        assert_eq!((start.inset, end.inset), (0, 2));
        assert_eq!(frame.span(start.span).unwrap().text(), "cd");
        assert_eq!(span_texts(&frame, 0).len(), 3);
    }

    #[test]
    fn test_apply_style_across_blocks() {
        let mut frame = setup("abc\ndef\nghi");
        let sel = Selection::new(spot(&frame, 0, 1), spot(&frame, 2, 2));
        apply_style(&mut frame, sel, Some("bold")).unwrap();

        let bold = Some("bold".to_string());
        assert_eq!(
            span_texts(&frame, 0),
            vec![("a".to_string(), None), ("bc".to_string(), bold.clone())]
        );
        assert_eq!(span_texts(&frame, 1), vec![("def".to_string(), bold.clone())]);
        assert_eq!(
            span_texts(&frame, 2),
            vec![("gh".to_string(), bold), ("i".to_string(), None)]
        );
        assert_eq!(frame.plain_text(), "abcdefghi");
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_apply_style_none_clears() {
        let mut frame = setup("abc");
        let sel = Selection::new(spot(&frame, 0, 0), spot(&frame, 0, 3));
        apply_style(&mut frame, sel, Some("italic")).unwrap();
        let sel = frame.selection().unwrap();
        apply_style(&mut frame, sel, None).unwrap();
        assert_eq!(span_texts(&frame, 0), vec![("abc".to_string(), None)]);
    }

    #[test]
    fn test_style_word_before() {
        let mut frame = setup("Xhello");
        let at = spot(&frame, 0, 1);
        let at = style_word_before(&mut frame, at, Some("bold")).unwrap();
        assert_eq!(
            span_texts(&frame, 0),
            vec![("X".to_string(), Some("bold".to_string())), ("hello".to_string(), None)]
        );
        assert_eq!(frame.span(at.span).unwrap().text(), "X");
        assert_eq!(at.inset, 1);
    }

    #[test]
    fn test_style_word_before_stops_at_whitespace() {
        let mut frame = setup("one two");
        let at = spot(&frame, 0, 7);
        let at = style_word_before(&mut frame, at, Some("italic")).unwrap();
        assert_eq!(
            span_texts(&frame, 0),
            vec![("one ".to_string(), None), ("two".to_string(), Some("italic".to_string()))]
        );
        assert_eq!(at.inset, 3);
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_style_word_before_after_space_inserts_empty_span() {
        let mut frame = setup("one ");
        let at = spot(&frame, 0, 4);
        let at = style_word_before(&mut frame, at, Some("bold")).unwrap();
        assert_eq!(at.inset, 0);
        assert_eq!(frame.span(at.span).unwrap().stylename(), Some("bold"));
        let at = insert_char(&mut frame, at, 'x').unwrap();
        assert_eq!(frame.plain_text(), "one x");
        assert_eq!(frame.span(at.span).unwrap().text(), "x");
    }

    #[test]
    fn test_style_word_before_at_span_start() {
        let mut frame = setup("hello");
        let at = spot(&frame, 0, 0);
        let at = style_word_before(&mut frame, at, Some("bold")).unwrap();
        assert_eq!(
            span_texts(&frame, 0),
            vec![(String::new(), Some("bold".to_string())), ("hello".to_string(), None)]
        );
        assert_eq!(at.inset, 0);
        frame.check_invariants().unwrap();

        let at = insert_char(&mut frame, at, 'X').unwrap();
        assert_eq!(frame.span(at.span).unwrap().text(), "X");
        assert_eq!(frame.plain_text(), "Xhello");
    }
}
