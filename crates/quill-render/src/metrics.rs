//! Character measurement supplied by the host.

use quill_core::style::RunStyle;
use quill_core::types::{FontStyle, FontWeight};

/// Per-character advance widths.
///
/// The layout engine measures text one character at a time, so hosts only
/// need to answer for a single character in a given font. Any closure with
/// the same signature as [`char_width`](Self::char_width) is a
/// `CharMetrics`.
pub trait CharMetrics {
    /// Advance width of `ch` in pixels.
    fn char_width(
        &self,
        ch: char,
        font_size: f32,
        font_family: &str,
        font_weight: FontWeight,
        font_style: FontStyle,
    ) -> f32;

    /// Advance width of `ch` set in a resolved run style.
    fn styled_width(&self, ch: char, style: &RunStyle) -> f32 {
        self.char_width(
            ch,
            style.font_size,
            &style.font_family,
            style.font_weight,
            style.font_style,
        )
    }

    /// Total advance of a string set in a resolved run style.
    fn text_width(&self, text: &str, style: &RunStyle) -> f32 {
        text.chars().map(|ch| self.styled_width(ch, style)).sum()
    }
}

impl<F> CharMetrics for F
where
    F: Fn(char, f32, &str, FontWeight, FontStyle) -> f32,
{
    fn char_width(
        &self,
        ch: char,
        font_size: f32,
        font_family: &str,
        font_weight: FontWeight,
        font_style: FontStyle,
    ) -> f32 {
        self(ch, font_size, font_family, font_weight, font_style)
    }
}

/// Fixed-advance metrics: every character has the same width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub advance: f32,
}

impl MonospaceMetrics {
    pub const fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl CharMetrics for MonospaceMetrics {
    fn char_width(&self, _: char, _: f32, _: &str, _: FontWeight, _: FontStyle) -> f32 {
        self.advance
    }
}
