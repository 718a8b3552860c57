//! Layout and painting for the Quill rich-text editing core.
//!
//! This crate turns a [`Frame`](quill_core::document::Frame) into a
//! [`RenderTree`] of blocks, lines, and runs, and paints that tree onto any
//! [`Renderer`]. Character widths come from a host-supplied
//! [`CharMetrics`].
//!
//! # Example
//!
//! ```
//! use quill_core::document::Frame;
//! use quill_render::prelude::*;
//!
//! let frame = Frame::from_text("hello world");
//! let metrics = MonospaceMetrics::new(10.0);
//! let tree = generate_render_tree(&frame, Size::new(60.0, 100.0), &metrics)?;
//! assert_eq!(tree.blocks[0].lines.len(), 2);
//!
//! let theme = Theme::default();
//! let mut renderer = RecordingRenderer::new();
//! let state = PaintState {
//!     current_line: None,
//!     selection: None,
//!     caret: None,
//!     popup: None,
//!     theme: &theme,
//!     metrics: &metrics,
//! };
//! draw_render_tree(&mut renderer, &tree, &state);
//! assert_eq!(renderer.texts().collect::<String>(), "hello world");
//! # Ok::<(), quill_render::LayoutError>(())
//! ```

pub mod layout;
pub mod metrics;
pub mod paint;
pub mod painter;
pub mod renderer;
pub mod tree;
pub mod types;

mod error;

pub use error::{LayoutError, LayoutResult};
pub use layout::generate_render_tree;
pub use metrics::{CharMetrics, MonospaceMetrics};
pub use painter::{draw_render_tree, Caret, PaintState, PopupView, Theme};
pub use renderer::{DrawCommand, RecordingRenderer, Renderer};
pub use tree::{RenderBlock, RenderLine, RenderPath, RenderRun, RenderTree};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::error::{LayoutError, LayoutResult};
    pub use crate::layout::generate_render_tree;
    pub use crate::metrics::{CharMetrics, MonospaceMetrics};
    pub use crate::paint::{FontSpec, Stroke};
    pub use crate::painter::{draw_render_tree, Caret, PaintState, PopupView, Theme};
    pub use crate::renderer::{DrawCommand, RecordingRenderer, Renderer};
    pub use crate::tree::{RenderBlock, RenderLine, RenderPath, RenderRun, RenderTree};
    pub use crate::types::{Point, Rect, Size};
}
