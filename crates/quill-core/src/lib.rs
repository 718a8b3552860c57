//! Document model and style cascade for the Quill rich-text editing core.
//!
//! This crate provides:
//!
//! - **Document model**: a [`Frame`](document::Frame) of blocks and spans held
//!   in handle arenas, with length bookkeeping kept consistent by a single
//!   mutation path
//! - **Positions**: [`Spot`](document::Spot), [`Bias`](document::Bias), and
//!   [`Selection`](document::Selection)
//! - **Styles**: named style tables, inline property maps, and cascading
//!   lookup from span to block to frame
//!
//! # Example
//!
//! ```
//! use quill_core::prelude::*;
//!
//! let mut frame = Frame::from_text("Hello\nworld");
//! let block = frame.blocks()[0];
//! let span = frame.block(block)?.spans()[0];
//! frame.set_span_stylename(span, Some("bold"))?;
//!
//! let style = resolve_run_style(&frame, span)?;
//! assert!(style.font_weight.is_bold());
//! # Ok::<(), quill_core::DocumentError>(())
//! ```

pub mod document;
pub mod logging;
pub mod style;
pub mod types;

mod error;

pub use error::{DocumentError, Result, StyleError};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::document::{Bias, Block, BlockId, Frame, Selection, Span, SpanId, Spot};
    pub use crate::error::{DocumentError, StyleError};
    pub use crate::style::{
        lookup_style, resolve_block_style, resolve_run_style, BlockStyle, PropertyMap,
        PropertyValue, RunStyle, StyleNode, StyleProperty, StyleSheet,
    };
    pub use crate::types::{Color, FontStyle, FontWeight, TextAlign};
}
