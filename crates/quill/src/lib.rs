//! Quill: a rich-text editing core.
//!
//! This crate drives a [`Frame`](quill_core::document::Frame) as an
//! interactive editor. An [`EditorSession`] owns the frame, its render
//! tree, the caret, and the autocomplete popup. Key events are mapped to
//! [`Command`]s through a configurable [`Keymap`], and each command reports
//! through an [`Effect`] whether the host needs to repaint.
//!
//! The host supplies character metrics, a [`Renderer`](quill_render::Renderer)
//! to paint into, and optionally a [`FrameScheduler`], a
//! [`CompletionSource`], and an enter action for single-line editors.
//!
//! # Example
//!
//! ```
//! use quill::prelude::*;
//!
//! let frame = Frame::from_text("hello");
//! let metrics = MonospaceMetrics::new(10.0);
//! let mut session = EditorSession::new(frame, Size::new(200.0, 100.0), metrics)?;
//!
//! session.process_key_event(&KeyEvent::char('X'))?;
//! assert_eq!(session.plain_text(), "Xhello");
//!
//! let mut renderer = RecordingRenderer::new();
//! session.paint(&mut renderer)?;
//! assert_eq!(renderer.texts().collect::<String>(), "Xhello");
//! # Ok::<(), quill::EditorError>(())
//! ```

pub mod command;
pub mod config;
pub mod cursor;
pub mod edit;
pub mod input;
pub mod keymap;
pub mod popup;
pub mod session;

mod error;

pub use command::{Axis, Command, Edge, Effect};
pub use config::{EditorConfig, ThemeConfig};
pub use cursor::Cursor;
pub use error::{EditorError, Result};
pub use input::KeyEvent;
pub use keymap::Keymap;
pub use popup::{CompletionSource, PopupState, WordListSource};
pub use session::{EditorSession, FrameScheduler};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::command::{Axis, Command, Edge, Effect};
    pub use crate::config::EditorConfig;
    pub use crate::cursor::Cursor;
    pub use crate::error::EditorError;
    pub use crate::input::KeyEvent;
    pub use crate::keymap::Keymap;
    pub use crate::popup::{CompletionSource, PopupState, WordListSource};
    pub use crate::session::{EditorSession, FrameScheduler};

    pub use quill_core::document::{Bias, Frame, Selection, Spot};
    pub use quill_render::metrics::{CharMetrics, MonospaceMetrics};
    pub use quill_render::renderer::{RecordingRenderer, Renderer};
    pub use quill_render::types::{Point, Size};
}
