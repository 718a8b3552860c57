//! The Frame → Block → Span document tree.
//!
//! Nodes live in arenas owned by [`Frame`] and are addressed by handle.
//! Positions inside the tree are [`Spot`]s.

mod frame;
mod node;
mod spot;

pub use frame::Frame;
pub use node::{Block, BlockId, Span, SpanId};
pub use spot::{Bias, Selection, Spot};
