//! Greedy word-wrap layout from a [`Frame`] to a [`RenderTree`].
//!
//! Each block is measured one character at a time. When a character would
//! push the line past the available width, the line breaks after the last
//! space seen on it; a word with no space before it on the line breaks at
//! the overflowing character. A space that overflows hangs at the end of
//! its line. Runs are cut at every span boundary and every line break.

use std::ops::Range;

use quill_core::document::{BlockId, Frame, SpanId};
use quill_core::logging::{span_names, targets};
use quill_core::style::{resolve_block_style, resolve_run_style, BlockStyle, RunStyle};
use quill_core::types::TextAlign;

use crate::error::LayoutResult;
use crate::metrics::CharMetrics;
use crate::tree::{RenderBlock, RenderLine, RenderRun, RenderTree};
use crate::types::{Rect, Size};

/// One measured character.
#[derive(Debug, Clone, Copy)]
struct Atom {
    /// Index into the block's span list.
    span: usize,
    /// Character offset within the span.
    offset: usize,
    ch: char,
    width: f32,
}

struct SpanInfo {
    id: SpanId,
    style: RunStyle,
}

/// Lay out every block of `frame` for a viewport.
///
/// Always returns a new tree. Only `viewport.width` affects line breaking.
pub fn generate_render_tree(
    frame: &Frame,
    viewport: Size,
    metrics: &dyn CharMetrics,
) -> LayoutResult<RenderTree> {
    let _span = tracing::debug_span!(span_names::LAYOUT, blocks = frame.block_count()).entered();

    let mut tree = RenderTree {
        blocks: Vec::with_capacity(frame.block_count()),
        width: viewport.width,
        height: 0.0,
    };

    for &block in frame.blocks() {
        let mut rendered = layout_block(frame, block, viewport.width, metrics)?;
        rendered.bounds.origin.y = tree.height;
        tree.height += rendered.bounds.height();
        tracing::trace!(
            target: targets::LAYOUT,
            ?block,
            lines = rendered.lines.len(),
            height = rendered.bounds.height(),
            "laid out block"
        );
        tree.blocks.push(rendered);
    }

    tracing::debug!(
        target: targets::LAYOUT,
        lines = tree.line_count(),
        height = tree.height,
        "layout complete"
    );
    Ok(tree)
}

fn layout_block(
    frame: &Frame,
    block: BlockId,
    width: f32,
    metrics: &dyn CharMetrics,
) -> LayoutResult<RenderBlock> {
    let style = resolve_block_style(frame, block)?;
    let available = (width - 2.0 * style.padding).max(0.0);

    let mut spans = Vec::new();
    let mut atoms = Vec::new();
    for (index, &id) in frame.block(block)?.spans().iter().enumerate() {
        let run_style = resolve_run_style(frame, id)?;
        for (offset, ch) in frame.span(id)?.text().chars().enumerate() {
            atoms.push(Atom {
                span: index,
                offset,
                ch,
                width: metrics.styled_width(ch, &run_style),
            });
        }
        spans.push(SpanInfo { id, style: run_style });
    }

    let mut lines = Vec::new();
    let mut y = style.padding;
    for range in break_lines(&atoms, available) {
        let line_atoms = &atoms[range];
        let mut line = build_line(line_atoms, &spans);
        line.bounds.origin.x =
            style.padding + align_offset(&style, available, content_width(line_atoms));
        line.bounds.origin.y = y;
        y += line.bounds.height();
        lines.push(line);
    }

    Ok(RenderBlock {
        block,
        bounds: Rect::new(0.0, 0.0, width, y + style.padding),
        style,
        lines,
    })
}

/// Split measured characters into line ranges.
///
/// Always yields at least one range, even for no characters.
fn break_lines(atoms: &[Atom], available: f32) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut pen: f32 = 0.0;
    let mut last_space: Option<usize> = None;
    let mut i = 0;

    while i < atoms.len() {
        let atom = atoms[i];
        if pen + atom.width > available && i > line_start {
            if atom.ch == ' ' {
                pen += atom.width;
                last_space = Some(i);
                i += 1;
                continue;
            }
            let break_at = last_space.map_or(i, |s| s + 1);
            lines.push(line_start..break_at);
            line_start = break_at;
            pen = atoms[break_at..i].iter().map(|a| a.width).sum::<f32>();
            last_space = None;
            continue;
        }
        pen += atom.width;
        if atom.ch == ' ' {
            last_space = Some(i);
        }
        i += 1;
    }
    lines.push(line_start..atoms.len());
    lines
}

fn build_line(atoms: &[Atom], spans: &[SpanInfo]) -> RenderLine {
    let mut runs: Vec<RenderRun> = Vec::new();
    let mut current: Option<usize> = None;
    let mut pen = 0.0;

    for atom in atoms {
        if current != Some(atom.span) {
            let info = &spans[atom.span];
            runs.push(RenderRun {
                span: info.id,
                span_start: atom.offset,
                span_end: atom.offset,
                text: String::new(),
                bounds: Rect::new(pen, 0.0, 0.0, info.style.line_box_height()),
                style: info.style.clone(),
            });
            current = Some(atom.span);
        }
        if let Some(run) = runs.last_mut() {
            run.span_end = atom.offset + 1;
            run.text.push(atom.ch);
            run.bounds.size.width += atom.width;
        }
        pen += atom.width;
    }

    // An empty block still gets a run so the caret has somewhere to sit.
    if runs.is_empty() {
        if let Some(info) = spans.first() {
            runs.push(RenderRun {
                span: info.id,
                span_start: 0,
                span_end: 0,
                text: String::new(),
                bounds: Rect::new(0.0, 0.0, 0.0, info.style.line_box_height()),
                style: info.style.clone(),
            });
        }
    }

    let height = runs
        .iter()
        .map(|r| r.bounds.height())
        .fold(0.0_f32, f32::max);
    for run in &mut runs {
        run.bounds.origin.y = height - run.bounds.height();
    }

    RenderLine {
        bounds: Rect::new(0.0, 0.0, pen, height),
        runs,
    }
}

/// Width of a line without its trailing spaces.
fn content_width(atoms: &[Atom]) -> f32 {
    let trailing = atoms.iter().rev().take_while(|a| a.ch == ' ').count();
    atoms[..atoms.len() - trailing].iter().map(|a| a.width).sum()
}

fn align_offset(style: &BlockStyle, available: f32, content: f32) -> f32 {
    let slack = (available - content).max(0.0);
    match style.align {
        TextAlign::Left => 0.0,
        TextAlign::Center => slack / 2.0,
        TextAlign::Right => slack,
    }
}
