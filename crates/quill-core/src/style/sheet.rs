//! Named style table.

use std::collections::BTreeMap;

use super::property::{PropertyMap, PropertyValue, StyleProperty};
use crate::types::{Color, FontStyle, FontWeight};

/// A table of named styles, keyed by style name.
///
/// Blocks and spans select an entry through their `stylename`. A frame owns
/// exactly one sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    styles: BTreeMap<String, PropertyMap>,
}

impl StyleSheet {
    /// Create an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sheet holding the built-in `bold`, `italic`, `heading`, and
    /// `code` styles.
    pub fn with_defaults() -> Self {
        let mut sheet = Self::new();
        sheet.insert(
            "bold",
            PropertyMap::new().with(
                StyleProperty::FontWeight,
                PropertyValue::Weight(FontWeight::BOLD),
            ),
        );
        sheet.insert(
            "italic",
            PropertyMap::new().with(
                StyleProperty::FontStyle,
                PropertyValue::FontStyle(FontStyle::Italic),
            ),
        );
        sheet.insert(
            "heading",
            PropertyMap::new()
                .with(StyleProperty::FontSize, PropertyValue::Length(24.0))
                .with(
                    StyleProperty::FontWeight,
                    PropertyValue::Weight(FontWeight::BOLD),
                ),
        );
        sheet.insert(
            "code",
            PropertyMap::new()
                .with(
                    StyleProperty::FontFamily,
                    PropertyValue::Family("monospace".to_string()),
                )
                .with(
                    StyleProperty::BackgroundColor,
                    PropertyValue::Color(Color::from_rgb8(0xEE, 0xEE, 0xEE)),
                ),
        );
        sheet
    }

    /// Add or replace a named style.
    pub fn insert(&mut self, name: impl Into<String>, properties: PropertyMap) {
        self.styles.insert(name.into(), properties);
    }

    /// Merge `properties` into a named style, creating it if needed.
    pub fn extend(&mut self, name: impl Into<String>, properties: &PropertyMap) {
        let entry = self.styles.entry(name.into()).or_default();
        for (property, value) in properties.iter() {
            entry.set(property, value.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyMap> {
        self.styles.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyMap> {
        self.styles.remove(name)
    }

    /// Style names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }
}
