//! Error types for the render crate.

use quill_core::document::BlockId;
use quill_core::DocumentError;
use thiserror::Error;

use crate::tree::RenderPath;

/// Errors that can occur during layout and render-tree lookups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The document was inconsistent while it was being laid out.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The block has no counterpart in the render tree.
    #[error("block {0:?} is not in the render tree")]
    BlockNotRendered(BlockId),

    /// A render path does not address a run of the tree.
    #[error("render path {0:?} does not address a run")]
    InvalidPath(RenderPath),
}

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
