//! Conversions between document spots and render-tree paths.

use quill_core::document::{Bias, Frame, Spot};
use quill_render::metrics::CharMetrics;
use quill_render::tree::{RenderPath, RenderTree};
use quill_render::types::Point;
use quill_render::{LayoutError, LayoutResult};

/// Locate a spot in the render tree.
///
/// A spot on a soft wrap resolves to the end of the upper line with
/// [`Bias::Left`] and to the start of the lower line with [`Bias::Right`].
/// On a run boundary within a line, the run owned by `spot.span` wins.
pub fn block_path_to_render_path(
    frame: &Frame,
    tree: &RenderTree,
    spot: Spot,
    bias: Bias,
) -> LayoutResult<RenderPath> {
    let b = tree.block_index(spot.block)?;
    let offset = frame.block_offset(spot)?;
    let block = &tree.blocks[b];
    let last = block.lines.len().saturating_sub(1);

    let mut line_start = 0;
    let mut chosen = None;
    for (l, line) in block.lines.iter().enumerate() {
        let line_end = line_start + line.len();
        if offset < line_end || (offset == line_end && (bias == Bias::Left || l == last)) {
            chosen = Some((l, offset - line_start));
            break;
        }
        line_start = line_end;
    }
    let (l, column) = chosen.ok_or(LayoutError::InvalidPath(RenderPath::new(b, last, 0, offset)))?;

    let line = &block.lines[l];
    let mut run_start = 0;
    let mut fallback = None;
    for (r, run) in line.runs.iter().enumerate() {
        let run_end = run_start + run.len();
        if column >= run_start && column <= run_end {
            let path = RenderPath::new(b, l, r, column - run_start);
            if run.span == spot.span {
                return Ok(path);
            }
            fallback.get_or_insert(path);
        }
        run_start = run_end;
    }
    fallback.ok_or(LayoutError::InvalidPath(RenderPath::new(b, l, 0, column)))
}

/// Convert a render path back to a document spot.
pub fn render_path_to_block_path(tree: &RenderTree, path: &RenderPath) -> LayoutResult<Spot> {
    tree.validate(path)?;
    let run = tree.run(path)?;
    Ok(Spot::new(
        tree.blocks[path.block].block,
        run.span,
        run.span_start + path.inset,
    ))
}

/// Surface position of the top-left corner of the caret at `path`.
pub fn render_path_to_xy(
    tree: &RenderTree,
    path: &RenderPath,
    metrics: &dyn CharMetrics,
) -> LayoutResult<Point> {
    tree.validate(path)?;
    let block = &tree.blocks[path.block];
    let line = &block.lines[path.line];
    let run = &line.runs[path.run];
    Ok(Point::new(
        block.bounds.left()
            + line.bounds.left()
            + run.bounds.left()
            + run.x_at(path.inset, metrics),
        block.bounds.top() + line.bounds.top() + run.bounds.top(),
    ))
}

/// Line-relative column of a path.
pub fn column_of(tree: &RenderTree, path: &RenderPath) -> LayoutResult<usize> {
    let line = tree
        .line(path.block, path.line)
        .ok_or(LayoutError::InvalidPath(*path))?;
    Ok(line.run_offset(path.run) + path.inset)
}

/// The bias that keeps a caret at `path` on the path's own line.
pub fn bias_for(tree: &RenderTree, path: &RenderPath) -> Bias {
    match tree.line(path.block, path.line) {
        Some(line) if !line.is_empty() && line.run_offset(path.run) + path.inset == line.len() => {
            Bias::Left
        }
        _ => Bias::Right,
    }
}

/// Hit-test a surface point.
///
/// Points outside every box clamp to the nearest block, line, and run, so
/// a click in a margin or below the text still lands on a character
/// boundary. Within a run, the pointer picks the boundary nearest to it.
/// Returns `None` only for an empty tree.
pub fn find_box_with_xy(
    tree: &RenderTree,
    point: Point,
    metrics: &dyn CharMetrics,
) -> Option<RenderPath> {
    let b = tree
        .blocks
        .iter()
        .position(|block| point.y < block.bounds.bottom())
        .unwrap_or(tree.blocks.len().checked_sub(1)?);
    let block = &tree.blocks[b];

    let local_y = point.y - block.bounds.top();
    let l = block
        .lines
        .iter()
        .position(|line| local_y < line.bounds.bottom())
        .unwrap_or(block.lines.len().checked_sub(1)?);
    let line = &block.lines[l];

    let local_x = point.x - block.bounds.left() - line.bounds.left();
    let r = line
        .runs
        .iter()
        .position(|run| local_x < run.bounds.right())
        .unwrap_or(line.runs.len().checked_sub(1)?);
    let run = &line.runs[r];

    let run_x = local_x - run.bounds.left();
    let mut pen = 0.0;
    let mut inset = run.len();
    for (i, ch) in run.text.chars().enumerate() {
        let width = metrics.styled_width(ch, &run.style);
        if run_x < pen + width / 2.0 {
            inset = i;
            break;
        }
        pen += width;
    }
    Some(RenderPath::new(b, l, r, inset))
}
