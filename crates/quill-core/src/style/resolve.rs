//! Cascade resolution from span to block to frame.

use super::property::{PropertyMap, PropertyValue, StyleProperty};
use crate::document::{BlockId, Frame, SpanId};
use crate::error::Result;
use crate::logging::targets;
use crate::types::{Color, FontStyle, FontWeight, TextAlign};

/// A node of the document that can be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleNode {
    Span(SpanId),
    Block(BlockId),
    Frame,
}

/// Look up a property starting at `node` and walking up to the frame.
///
/// At each node the named style selected by its `stylename` is consulted
/// first, then the node's inline map, then the parent. At the frame the
/// inline defaults are consulted, then the property's initial value.
///
/// An unknown style name is logged and skipped. Returns `None` only if
/// `node` is not part of `frame`.
pub fn lookup_style(
    frame: &Frame,
    node: StyleNode,
    property: StyleProperty,
) -> Option<PropertyValue> {
    let mut current = node;
    loop {
        current = match current {
            StyleNode::Span(id) => {
                let span = frame.span(id).ok()?;
                if let Some(value) = lookup_local(frame, span.stylename(), span.style(), property) {
                    return Some(value);
                }
                StyleNode::Block(span.block())
            }
            StyleNode::Block(id) => {
                let block = frame.block(id).ok()?;
                if let Some(value) =
                    lookup_local(frame, block.stylename(), block.style(), property)
                {
                    return Some(value);
                }
                StyleNode::Frame
            }
            StyleNode::Frame => {
                return Some(
                    frame
                        .style()
                        .get(property)
                        .cloned()
                        .unwrap_or_else(|| property.initial_value()),
                );
            }
        };
    }
}

fn lookup_local(
    frame: &Frame,
    stylename: Option<&str>,
    inline: &PropertyMap,
    property: StyleProperty,
) -> Option<PropertyValue> {
    if let Some(name) = stylename {
        match frame.styles().get(name) {
            Some(named) => {
                if let Some(value) = named.get(property) {
                    return Some(value.clone());
                }
            }
            None => {
                tracing::warn!(
                    target: targets::STYLE,
                    stylename = name,
                    %property,
                    "unknown style name"
                );
            }
        }
    }
    inline.get(property).cloned()
}

fn resolve<T>(
    frame: &Frame,
    node: StyleNode,
    property: StyleProperty,
    extract: impl Fn(&PropertyValue) -> Option<T>,
) -> Option<T> {
    let value = lookup_style(frame, node, property)?;
    extract(&value).or_else(|| extract(&property.initial_value()))
}

/// Text style of a span, fully resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStyle {
    pub color: Color,
    pub background: Color,
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    /// Line-height multiplier applied to `font_size`.
    pub line_height: f32,
}

impl Default for RunStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            background: Color::TRANSPARENT,
            font_family: "sans-serif".to_string(),
            font_size: 16.0,
            font_weight: FontWeight::NORMAL,
            font_style: FontStyle::Normal,
            line_height: 1.2,
        }
    }
}

impl RunStyle {
    /// Height of one line set in this style.
    pub fn line_box_height(&self) -> f32 {
        self.font_size * self.line_height
    }
}

/// Box style of a block, fully resolved.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlockStyle {
    pub background: Color,
    pub border_color: Color,
    pub border_width: f32,
    pub padding: f32,
    pub align: TextAlign,
}

/// Resolve every text property of a span.
pub fn resolve_run_style(frame: &Frame, span: SpanId) -> Result<RunStyle> {
    frame.span(span)?;
    let node = StyleNode::Span(span);
    let defaults = RunStyle::default();
    Ok(RunStyle {
        color: resolve(frame, node, StyleProperty::Color, PropertyValue::as_color)
            .unwrap_or(defaults.color),
        background: resolve(frame, node, StyleProperty::BackgroundColor, PropertyValue::as_color)
            .unwrap_or(defaults.background),
        font_family: resolve(frame, node, StyleProperty::FontFamily, |v| {
            v.as_family().map(str::to_string)
        })
        .unwrap_or(defaults.font_family),
        font_size: resolve(frame, node, StyleProperty::FontSize, PropertyValue::as_f32)
            .unwrap_or(defaults.font_size),
        font_weight: resolve(frame, node, StyleProperty::FontWeight, PropertyValue::as_weight)
            .unwrap_or(defaults.font_weight),
        font_style: resolve(frame, node, StyleProperty::FontStyle, PropertyValue::as_font_style)
            .unwrap_or(defaults.font_style),
        line_height: resolve(frame, node, StyleProperty::LineHeight, PropertyValue::as_f32)
            .unwrap_or(defaults.line_height),
    })
}

/// Resolve every box property of a block.
pub fn resolve_block_style(frame: &Frame, block: BlockId) -> Result<BlockStyle> {
    frame.block(block)?;
    let node = StyleNode::Block(block);
    let defaults = BlockStyle::default();
    Ok(BlockStyle {
        background: resolve(frame, node, StyleProperty::BackgroundColor, PropertyValue::as_color)
            .unwrap_or(defaults.background),
        border_color: resolve(frame, node, StyleProperty::BorderColor, PropertyValue::as_color)
            .unwrap_or(defaults.border_color),
        border_width: resolve(frame, node, StyleProperty::BorderWidth, PropertyValue::as_f32)
            .unwrap_or(defaults.border_width),
        padding: resolve(frame, node, StyleProperty::Padding, PropertyValue::as_f32)
            .unwrap_or(defaults.padding),
        align: resolve(frame, node, StyleProperty::TextAlign, PropertyValue::as_align)
            .unwrap_or(defaults.align),
    })
}
