//! The drawing interface the painter targets.
//!
//! This module defines the [`Renderer`] trait, the small 2D surface the
//! editing core paints onto, plus [`RecordingRenderer`], a display-list
//! implementation for tests and headless hosts.

use crate::paint::{FontSpec, Stroke};
use crate::types::{Point, Rect};
use quill_core::types::Color;

/// The 2D drawing surface.
///
/// Coordinates are in the current local space, as established by
/// [`translate`](Self::translate) calls since the last [`save`](Self::save).
///
/// ```ignore
/// renderer.save();
/// renderer.translate(10.0, 10.0);
/// renderer.fill_rect(rect, Color::WHITE);
/// renderer.restore();
/// ```
pub trait Renderer {
    // =========================================================================
    // State Management
    // =========================================================================

    /// Push the current transform onto the state stack.
    fn save(&mut self);

    /// Pop the most recently saved transform.
    fn restore(&mut self);

    /// Move the origin of the local space.
    fn translate(&mut self, tx: f32, ty: f32);

    // =========================================================================
    // Shapes
    // =========================================================================

    /// Fill a rectangle with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Stroke a rectangle outline.
    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke);

    // =========================================================================
    // Text
    // =========================================================================

    /// Draw a string with its text box's top-left corner at `origin`.
    fn fill_text(&mut self, text: &str, font: &FontSpec, origin: Point, color: Color);
}

/// Saved renderer state for save/restore operations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderState {
    /// Accumulated translation.
    pub offset: Point,
}

/// Common state management for renderers.
///
/// Tracks the translation stack so implementations can map local
/// coordinates to surface coordinates.
#[derive(Debug, Clone, Default)]
pub struct RenderStateStack {
    stack: Vec<RenderState>,
    current: RenderState,
}

impl RenderStateStack {
    /// Create a new state stack with default state.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> &RenderState {
        &self.current
    }

    pub fn save(&mut self) {
        self.stack.push(self.current);
    }

    /// Restore the previously saved state. Unbalanced calls are ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.current = state;
        }
    }

    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.current.offset = self.current.offset.offset(tx, ty);
    }

    /// Saved states not yet restored.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Map a local point to surface coordinates.
    pub fn map_point(&self, point: Point) -> Point {
        point.offset(self.current.offset.x, self.current.offset.y)
    }

    /// Map a local rectangle to surface coordinates.
    pub fn map_rect(&self, rect: Rect) -> Rect {
        rect.offset(self.current.offset.x, self.current.offset.y)
    }
}

/// One recorded drawing operation, in surface coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        stroke: Stroke,
    },
    Text {
        text: String,
        font: FontSpec,
        origin: Point,
        color: Color,
    },
}

/// A [`Renderer`] that records a display list instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    state: RenderStateStack,
    commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Text strings drawn, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Rectangles filled with `color`, in order.
    pub fn filled_with(&self, color: Color) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillRect { rect, color: c } if *c == color => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// Whether every `save` was matched by a `restore`.
    pub fn is_balanced(&self) -> bool {
        self.state.depth() == 0
    }
}

impl Renderer for RecordingRenderer {
    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.state.translate(tx, ty);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            rect: self.state.map_rect(rect),
            color,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke) {
        self.commands.push(DrawCommand::StrokeRect {
            rect: self.state.map_rect(rect),
            stroke: *stroke,
        });
    }

    fn fill_text(&mut self, text: &str, font: &FontSpec, origin: Point, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            font: font.clone(),
            origin: self.state.map_point(origin),
            color,
        });
    }
}
