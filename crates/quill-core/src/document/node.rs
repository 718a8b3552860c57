//! Block and span nodes stored in the frame's arenas.

use slotmap::new_key_type;

use crate::style::PropertyMap;

new_key_type! {
    /// Handle to a [`Block`] in a [`Frame`](super::Frame).
    pub struct BlockId;

    /// Handle to a [`Span`] in a [`Frame`](super::Frame).
    pub struct SpanId;
}

/// A paragraph: an ordered run of spans.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub(crate) spans: Vec<SpanId>,
    pub(crate) len: usize,
    pub(crate) stylename: Option<String>,
    pub(crate) style: PropertyMap,
}

impl Block {
    /// Child spans in order.
    pub fn spans(&self) -> &[SpanId] {
        &self.spans
    }

    /// Total characters across all spans.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn stylename(&self) -> Option<&str> {
        self.stylename.as_deref()
    }

    /// Inline style map.
    pub fn style(&self) -> &PropertyMap {
        &self.style
    }
}

/// A run of text sharing one style.
#[derive(Debug, Clone)]
pub struct Span {
    pub(crate) text: String,
    pub(crate) len: usize,
    pub(crate) block: BlockId,
    pub(crate) stylename: Option<String>,
    pub(crate) style: PropertyMap,
}

impl Span {
    pub(crate) fn new(block: BlockId, text: &str) -> Self {
        Self {
            text: text.to_string(),
            len: text.chars().count(),
            block,
            stylename: None,
            style: PropertyMap::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The owning block.
    pub fn block(&self) -> BlockId {
        self.block
    }

    pub fn stylename(&self) -> Option<&str> {
        self.stylename.as_deref()
    }

    /// Inline style map.
    pub fn style(&self) -> &PropertyMap {
        &self.style
    }

    /// The character at `index`, if any.
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.text.chars().nth(index)
    }

    /// The text between two character offsets.
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let from = byte_offset(&self.text, start);
        let to = byte_offset(&self.text, end.max(start));
        &self.text[from..to]
    }
}

/// Byte offset of the character at `index`, or the string length past the end.
pub(crate) fn byte_offset(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_slice_multibyte() {
        let span = Span::new(BlockId::default(), "héllo wörld");
        assert_eq!(span.len(), 11);
        assert_eq!(span.slice(1, 5), "éllo");
        assert_eq!(span.slice(7, 20), "örld");
        assert_eq!(span.char_at(7), Some('ö'));
        assert_eq!(span.char_at(11), None);
    }
}
