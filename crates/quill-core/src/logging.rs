//! Tracing targets and span names for Quill.
//!
//! Quill uses the `tracing` crate for instrumentation and never installs a
//! subscriber itself. To see logs, install one in the host application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("quill_core::style=warn,quill::dispatch=trace")
//!         .init();
//! }
//! ```

/// Span names used throughout Quill for tracing.
pub mod span_names {
    /// Full relayout of a frame.
    pub const LAYOUT: &str = "quill::layout";
    /// Painting a render tree.
    pub const PAINT: &str = "quill::paint";
    /// Handling one key event.
    pub const KEY_EVENT: &str = "quill::key_event";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Document model target.
    pub const DOCUMENT: &str = "quill_core::document";
    /// Style resolution target.
    pub const STYLE: &str = "quill_core::style";
    /// Layout engine target.
    pub const LAYOUT: &str = "quill_render::layout";
    /// Painter target.
    pub const PAINT: &str = "quill_render::paint";
    /// Cursor navigation target.
    pub const CURSOR: &str = "quill::cursor";
    /// Editing operations target.
    pub const EDIT: &str = "quill::edit";
    /// Command and key dispatch target.
    pub const DISPATCH: &str = "quill::dispatch";
    /// Configuration loading target.
    pub const CONFIG: &str = "quill::config";
}
