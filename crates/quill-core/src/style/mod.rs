//! Style properties, named styles, and cascade resolution.
//!
//! A property is looked up span → block → frame. At each node a named style
//! (selected by `stylename`) wins over the node's inline map, and the inline
//! map wins over the parent. See [`lookup_style`].

mod property;
mod resolve;
mod sheet;

pub use property::{PropertyMap, PropertyValue, StyleProperty};
pub use resolve::{
    lookup_style, resolve_block_style, resolve_run_style, BlockStyle, RunStyle, StyleNode,
};
pub use sheet::StyleSheet;
