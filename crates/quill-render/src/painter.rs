//! Painting a [`RenderTree`] onto a [`Renderer`].

use quill_core::logging::{span_names, targets};
use quill_core::types::Color;

use crate::metrics::CharMetrics;
use crate::paint::{FontSpec, Stroke};
use crate::renderer::Renderer;
use crate::tree::{RenderLine, RenderPath, RenderRun, RenderTree};
use crate::types::{Point, Rect};

/// Colors used for editor chrome.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub selection: Color,
    pub caret: Color,
    pub current_line: Color,
    pub popup_background: Color,
    pub popup_text: Color,
    pub popup_border: Color,
    pub popup_font: FontSpec,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            selection: Color::from_rgba8(0x33, 0x90, 0xFF, 0x66),
            caret: Color::BLACK,
            current_line: Color::from_rgb8(0xF4, 0xF4, 0xF4),
            popup_background: Color::WHITE,
            popup_text: Color::BLACK,
            popup_border: Color::GRAY,
            popup_font: FontSpec::new("sans-serif", 14.0),
        }
    }
}

/// The autocomplete list to overlay, in surface coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PopupView<'a> {
    pub xy: Point,
    pub lines: &'a [String],
    pub selected_index: usize,
}

/// Caret placement inside the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Caret {
    pub path: RenderPath,
    pub width: f32,
}

/// Everything besides the tree that affects a paint.
pub struct PaintState<'a> {
    /// `(block, line)` of the line holding the caret.
    pub current_line: Option<(usize, usize)>,
    /// Selected range in document order.
    pub selection: Option<(RenderPath, RenderPath)>,
    pub caret: Option<Caret>,
    pub popup: Option<PopupView<'a>>,
    pub theme: &'a Theme,
    pub metrics: &'a dyn CharMetrics,
}

const POPUP_PADDING: f32 = 4.0;

/// Paint blocks, lines, runs, selection, caret, and popup.
pub fn draw_render_tree<R: Renderer + ?Sized>(
    renderer: &mut R,
    tree: &RenderTree,
    state: &PaintState<'_>,
) {
    let _span = tracing::debug_span!(span_names::PAINT).entered();

    for (b, block) in tree.blocks.iter().enumerate() {
        let local = Rect::new(0.0, 0.0, block.bounds.width(), block.bounds.height());
        renderer.save();
        renderer.translate(block.bounds.left(), block.bounds.top());

        if block.style.background.a > 0.0 {
            renderer.fill_rect(local, block.style.background);
        }
        if block.style.border_width > 0.0 && block.style.border_color.a > 0.0 {
            let stroke = Stroke::new(block.style.border_color, block.style.border_width);
            renderer.stroke_rect(local, &stroke);
        }

        for (l, line) in block.lines.iter().enumerate() {
            renderer.save();
            renderer.translate(line.bounds.left(), line.bounds.top());
            if state.current_line == Some((b, l)) {
                let highlight = Rect::new(
                    -line.bounds.left(),
                    0.0,
                    block.bounds.width(),
                    line.bounds.height(),
                );
                renderer.fill_rect(highlight, state.theme.current_line);
            }
            draw_line(renderer, line, (b, l), block.style.background, state);
            renderer.restore();
        }

        renderer.restore();
    }

    if let Some(popup) = &state.popup {
        draw_popup(renderer, popup, state.theme, state.metrics);
    }
    tracing::trace!(target: targets::PAINT, blocks = tree.blocks.len(), "painted tree");
}

fn draw_line<R: Renderer + ?Sized>(
    renderer: &mut R,
    line: &RenderLine,
    key: (usize, usize),
    block_background: Color,
    state: &PaintState<'_>,
) {
    for (r, run) in line.runs.iter().enumerate() {
        let origin = run.bounds.origin;
        if run.style.background.a > 0.0
            && run.style.background != block_background
            && !run.is_empty()
        {
            renderer.fill_rect(run.bounds, run.style.background);
        }

        if let Some((from, to)) = state
            .selection
            .and_then(|sel| selected_range(&sel, (key.0, key.1, r), run.len()))
        {
            let x0 = run.x_at(from, state.metrics);
            let x1 = run.x_at(to, state.metrics);
            renderer.fill_rect(
                Rect::new(origin.x + x0, origin.y, x1 - x0, run.bounds.height()),
                state.theme.selection,
            );
        }

        if !run.text.is_empty() {
            renderer.fill_text(&run.text, &FontSpec::from(&run.style), origin, run.style.color);
        }

        if let Some(caret) = state
            .caret
            .filter(|c| (c.path.block, c.path.line, c.path.run) == (key.0, key.1, r))
        {
            draw_caret(renderer, run, caret, state);
        }
    }
}

fn draw_caret<R: Renderer + ?Sized>(
    renderer: &mut R,
    run: &RenderRun,
    caret: Caret,
    state: &PaintState<'_>,
) {
    let x = run.bounds.left() + run.x_at(caret.path.inset, state.metrics);
    renderer.fill_rect(
        Rect::new(x, run.bounds.top(), caret.width, run.bounds.height()),
        state.theme.caret,
    );
}

/// Portion `[from, to)` of run `key` covered by an ordered selection.
fn selected_range(
    selection: &(RenderPath, RenderPath),
    key: (usize, usize, usize),
    run_len: usize,
) -> Option<(usize, usize)> {
    let (start, end) = selection;
    let start_key = (start.block, start.line, start.run);
    let end_key = (end.block, end.line, end.run);
    if key < start_key || key > end_key {
        return None;
    }
    let from = if key == start_key { start.inset } else { 0 };
    let to = if key == end_key { end.inset } else { run_len };
    (to > from).then_some((from, to))
}

/// Height of one popup row.
pub fn popup_row_height(theme: &Theme) -> f32 {
    theme.popup_font.size * 1.2
}

/// Surface rectangle covered by a popup.
pub fn popup_rect(popup: &PopupView<'_>, theme: &Theme, metrics: &dyn CharMetrics) -> Rect {
    let font = &theme.popup_font;
    let widest = popup
        .lines
        .iter()
        .map(|line| {
            line.chars()
                .map(|ch| metrics.char_width(ch, font.size, &font.family, font.weight, font.style))
                .sum::<f32>()
        })
        .fold(0.0_f32, f32::max);
    Rect::new(
        popup.xy.x,
        popup.xy.y,
        widest + 2.0 * POPUP_PADDING,
        popup.lines.len() as f32 * popup_row_height(theme) + 2.0 * POPUP_PADDING,
    )
}

fn draw_popup<R: Renderer + ?Sized>(
    renderer: &mut R,
    popup: &PopupView<'_>,
    theme: &Theme,
    metrics: &dyn CharMetrics,
) {
    if popup.lines.is_empty() {
        return;
    }
    let frame = popup_rect(popup, theme, metrics);
    let row_height = popup_row_height(theme);
    renderer.fill_rect(frame, theme.popup_background);
    renderer.stroke_rect(frame, &Stroke::new(theme.popup_border, 1.0));

    for (index, line) in popup.lines.iter().enumerate() {
        let top = frame.top() + POPUP_PADDING + index as f32 * row_height;
        let origin = Point::new(frame.left() + POPUP_PADDING, top);
        if index == popup.selected_index {
            renderer.fill_rect(
                Rect::new(frame.left(), top, frame.width(), row_height),
                theme.popup_text,
            );
            renderer.fill_text(line, &theme.popup_font, origin, theme.popup_background);
        } else {
            renderer.fill_text(line, &theme.popup_font, origin, theme.popup_text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::generate_render_tree;
    use crate::metrics::MonospaceMetrics;
    use crate::renderer::{DrawCommand, RecordingRenderer};
    use crate::types::Size;
    use quill_core::document::Frame;

    const METRICS: MonospaceMetrics = MonospaceMetrics::new(10.0);

    fn setup(text: &str) -> RenderTree {
        let frame = Frame::from_text(text);
        generate_render_tree(&frame, Size::new(50.0, 100.0), &METRICS).unwrap()
    }

    fn state(theme: &Theme) -> PaintState<'_> {
        PaintState {
            current_line: None,
            selection: None,
            caret: None,
            popup: None,
            theme,
            metrics: &METRICS,
        }
    }

    #[test]
    fn test_draws_text_per_run() {
        let tree = setup("hello world\nnext");
        let theme = Theme::default();
        let mut renderer = RecordingRenderer::new();
        draw_render_tree(&mut renderer, &tree, &state(&theme));

        assert_eq!(renderer.texts().collect::<Vec<_>>(), vec!["hello ", "world", "next"]);
        assert!(renderer.is_balanced());
        let line_height = 16.0 * 1.2;
        match &renderer.commands()[1] {
            DrawCommand::Text { origin, .. } => assert_eq!(*origin, Point::new(0.0, line_height)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_current_line_and_caret() {
        let tree = setup("abc");
        let theme = Theme::default();
        let mut paint = state(&theme);
        paint.current_line = Some((0, 0));
        paint.caret = Some(Caret {
            path: RenderPath::new(0, 0, 0, 2),
            width: 2.0,
        });
        let mut renderer = RecordingRenderer::new();
        draw_render_tree(&mut renderer, &tree, &paint);

        assert_eq!(
            renderer.filled_with(theme.current_line),
            vec![Rect::new(0.0, 0.0, 50.0, 16.0 * 1.2)]
        );
        assert_eq!(
            renderer.filled_with(theme.caret),
            vec![Rect::new(20.0, 0.0, 2.0, 16.0 * 1.2)]
        );
    }

    #[test]
    fn test_selection_spans_lines() {
        let tree = setup("hello world");
        let theme = Theme::default();
        let mut paint = state(&theme);
        paint.selection = Some((RenderPath::new(0, 0, 0, 2), RenderPath::new(0, 1, 0, 3)));
        let mut renderer = RecordingRenderer::new();
        draw_render_tree(&mut renderer, &tree, &paint);

        let line_height = 16.0 * 1.2;
        assert_eq!(
            renderer.filled_with(theme.selection),
            vec![
                Rect::new(20.0, 0.0, 40.0, line_height),
                Rect::new(0.0, line_height, 30.0, line_height),
            ]
        );
    }

    #[test]
    fn test_popup_inverts_selected_row() {
        let tree = setup("abc");
        let theme = Theme::default();
        let lines = vec!["alpha".to_string(), "beta".to_string()];
        let mut paint = state(&theme);
        paint.popup = Some(PopupView {
            xy: Point::new(5.0, 30.0),
            lines: &lines,
            selected_index: 1,
        });
        let mut renderer = RecordingRenderer::new();
        draw_render_tree(&mut renderer, &tree, &paint);

        let texts: Vec<_> = renderer
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, color, .. } => Some((text.as_str(), *color)),
                _ => None,
            })
            .collect();
        assert_eq!(
            texts,
            vec![
                ("abc", Color::BLACK),
                ("alpha", theme.popup_text),
                ("beta", theme.popup_background),
            ]
        );
        // Popup frame plus the inverted row.
        let frame = renderer.filled_with(theme.popup_background);
        assert_eq!(frame.len(), 1);
        assert_eq!(frame[0].origin, Point::new(5.0, 30.0));
        assert_eq!(renderer.filled_with(theme.popup_text).len(), 1);
    }

    #[test]
    fn test_selected_range() {
        let sel = (RenderPath::new(0, 0, 1, 2), RenderPath::new(1, 0, 0, 1));
        assert_eq!(selected_range(&sel, (0, 0, 0), 5), None);
        assert_eq!(selected_range(&sel, (0, 0, 1), 5), Some((2, 5)));
        assert_eq!(selected_range(&sel, (0, 3, 0), 4), Some((0, 4)));
        assert_eq!(selected_range(&sel, (1, 0, 0), 4), Some((0, 1)));
        assert_eq!(selected_range(&sel, (1, 0, 1), 4), None);
    }
}
