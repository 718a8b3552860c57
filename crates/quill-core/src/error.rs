//! Error types for the document model and style cascade.

use crate::document::{BlockId, SpanId};

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Errors raised by [`Frame`](crate::document::Frame) operations.
///
/// Every variant signals a broken precondition or a violated length
/// invariant. Callers should propagate them rather than continue editing
/// the same document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// A block with content or spans was asked to be removed.
    #[error("block {block:?} is not empty ({len} chars in {spans} spans)")]
    BlockNotEmpty {
        block: BlockId,
        len: usize,
        spans: usize,
    },

    /// The block handle does not refer to a live block of this frame.
    #[error("block {0:?} is not part of this frame")]
    StaleBlock(BlockId),

    /// The span handle does not refer to a live span of this frame.
    #[error("span {0:?} is not part of this frame")]
    StaleSpan(SpanId),

    /// The span exists but is not a child of the given block.
    #[error("span {span:?} does not belong to block {block:?}")]
    SpanNotInBlock { span: SpanId, block: BlockId },

    /// An index into a block or span list is out of range.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A character offset lies past the end of its span.
    #[error("inset {inset} out of bounds for span of length {len}")]
    InsetOutOfBounds { inset: usize, len: usize },

    /// A recorded length disagrees with the content it summarizes.
    #[error("length mismatch on {node}: recorded {recorded}, actual {actual}")]
    LengthMismatch {
        node: String,
        recorded: usize,
        actual: usize,
    },

    /// A span's parent handle does not list the span among its children.
    #[error("span {0:?} is not listed by its parent block")]
    OrphanSpan(SpanId),
}

impl DocumentError {
    /// Create a length mismatch error.
    pub fn length_mismatch(node: impl Into<String>, recorded: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            node: node.into(),
            recorded,
            actual,
        }
    }
}

/// Errors raised while parsing style property values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    /// The property name is not one of the supported properties.
    #[error("Unknown style property '{0}'")]
    UnknownProperty(String),

    /// Invalid property value.
    #[error("Invalid value for property '{property}': {message}")]
    InvalidValue { property: String, message: String },
}

impl StyleError {
    /// Create a value error.
    pub fn invalid_value(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            property: property.into(),
            message: message.into(),
        }
    }
}
