//! Style property keys, typed values, and property maps.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::StyleError;
use crate::types::{Color, FontStyle, FontWeight, TextAlign};

/// A style property understood by the cascade.
///
/// Names follow CSS spelling, so `"font-size"` parses to
/// [`StyleProperty::FontSize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleProperty {
    Color,
    BackgroundColor,
    BorderColor,
    BorderWidth,
    FontFamily,
    FontSize,
    FontWeight,
    FontStyle,
    TextAlign,
    Padding,
    LineHeight,
}

impl StyleProperty {
    /// Every supported property.
    pub const ALL: [StyleProperty; 11] = [
        Self::Color,
        Self::BackgroundColor,
        Self::BorderColor,
        Self::BorderWidth,
        Self::FontFamily,
        Self::FontSize,
        Self::FontWeight,
        Self::FontStyle,
        Self::TextAlign,
        Self::Padding,
        Self::LineHeight,
    ];

    /// The CSS-style name of the property.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::BackgroundColor => "background-color",
            Self::BorderColor => "border-color",
            Self::BorderWidth => "border-width",
            Self::FontFamily => "font-family",
            Self::FontSize => "font-size",
            Self::FontWeight => "font-weight",
            Self::FontStyle => "font-style",
            Self::TextAlign => "text-align",
            Self::Padding => "padding",
            Self::LineHeight => "line-height",
        }
    }

    /// The value used when no node in the cascade sets the property.
    pub fn initial_value(self) -> PropertyValue {
        match self {
            Self::Color => PropertyValue::Color(Color::BLACK),
            Self::BackgroundColor | Self::BorderColor => PropertyValue::Color(Color::TRANSPARENT),
            Self::BorderWidth | Self::Padding => PropertyValue::Length(0.0),
            Self::FontFamily => PropertyValue::Family("sans-serif".to_string()),
            Self::FontSize => PropertyValue::Length(16.0),
            Self::FontWeight => PropertyValue::Weight(FontWeight::NORMAL),
            Self::FontStyle => PropertyValue::FontStyle(FontStyle::Normal),
            Self::TextAlign => PropertyValue::Align(TextAlign::Left),
            Self::LineHeight => PropertyValue::Number(1.2),
        }
    }
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StyleProperty {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| StyleError::UnknownProperty(s.to_string()))
    }
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Color(Color),
    /// A length in pixels.
    Length(f32),
    /// A unitless number, such as a line-height multiplier.
    Number(f32),
    Family(String),
    Weight(FontWeight),
    FontStyle(FontStyle),
    Align(TextAlign),
}

impl PropertyValue {
    /// Parse a value for `property` from its textual form.
    ///
    /// Lengths accept an optional `px` suffix. Colors are hex strings.
    pub fn parse(property: StyleProperty, value: &str) -> Result<Self, StyleError> {
        let raw = value.trim();
        let invalid = |message: &str| StyleError::invalid_value(property.name(), message);

        match property {
            StyleProperty::Color | StyleProperty::BackgroundColor | StyleProperty::BorderColor => {
                if raw.eq_ignore_ascii_case("transparent") {
                    return Ok(Self::Color(Color::TRANSPARENT));
                }
                Color::from_hex(raw)
                    .map(Self::Color)
                    .ok_or_else(|| invalid("expected a hex color like #RRGGBB"))
            }
            StyleProperty::BorderWidth | StyleProperty::FontSize | StyleProperty::Padding => {
                let number = raw.strip_suffix("px").unwrap_or(raw).trim();
                match number.parse::<f32>() {
                    Ok(px) if px >= 0.0 && px.is_finite() => Ok(Self::Length(px)),
                    _ => Err(invalid("expected a non-negative length")),
                }
            }
            StyleProperty::LineHeight => match raw.parse::<f32>() {
                Ok(n) if n > 0.0 && n.is_finite() => Ok(Self::Number(n)),
                _ => Err(invalid("expected a positive number")),
            },
            StyleProperty::FontFamily => {
                let family = raw.trim_matches(|c| c == '"' || c == '\'');
                if family.is_empty() {
                    Err(invalid("font family must not be empty"))
                } else {
                    Ok(Self::Family(family.to_string()))
                }
            }
            StyleProperty::FontWeight => match raw.to_ascii_lowercase().as_str() {
                "normal" => Ok(Self::Weight(FontWeight::NORMAL)),
                "bold" => Ok(Self::Weight(FontWeight::BOLD)),
                other => other
                    .parse::<u16>()
                    .map(|w| Self::Weight(FontWeight::new(w)))
                    .map_err(|_| invalid("expected normal, bold, or 100-900")),
            },
            StyleProperty::FontStyle => match raw.to_ascii_lowercase().as_str() {
                "normal" => Ok(Self::FontStyle(FontStyle::Normal)),
                "italic" => Ok(Self::FontStyle(FontStyle::Italic)),
                "oblique" => Ok(Self::FontStyle(FontStyle::Oblique)),
                _ => Err(invalid("expected normal, italic, or oblique")),
            },
            StyleProperty::TextAlign => match raw.to_ascii_lowercase().as_str() {
                "left" => Ok(Self::Align(TextAlign::Left)),
                "center" => Ok(Self::Align(TextAlign::Center)),
                "right" => Ok(Self::Align(TextAlign::Right)),
                _ => Err(invalid("expected left, center, or right")),
            },
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// The numeric payload of a length or number value.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Length(v) | Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_family(&self) -> Option<&str> {
        match self {
            Self::Family(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_weight(&self) -> Option<FontWeight> {
        match self {
            Self::Weight(w) => Some(*w),
            _ => None,
        }
    }

    pub fn as_font_style(&self) -> Option<FontStyle> {
        match self {
            Self::FontStyle(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_align(&self) -> Option<TextAlign> {
        match self {
            Self::Align(a) => Some(*a),
            _ => None,
        }
    }
}

/// A set of property assignments, used for inline styles and named styles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    values: HashMap<StyleProperty, PropertyValue>,
}

impl PropertyMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, property: StyleProperty, value: PropertyValue) -> Self {
        self.set(property, value);
        self
    }

    /// Build a map from textual `name -> value` pairs.
    pub fn parse<'a, I>(pairs: I) -> Result<Self, StyleError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut map = Self::new();
        for (name, value) in pairs {
            let property: StyleProperty = name.parse()?;
            map.set(property, PropertyValue::parse(property, value)?);
        }
        Ok(map)
    }

    pub fn get(&self, property: StyleProperty) -> Option<&PropertyValue> {
        self.values.get(&property)
    }

    pub fn set(&mut self, property: StyleProperty, value: PropertyValue) {
        self.values.insert(property, value);
    }

    pub fn remove(&mut self, property: StyleProperty) -> Option<PropertyValue> {
        self.values.remove(&property)
    }

    pub fn contains(&self, property: StyleProperty) -> bool {
        self.values.contains_key(&property)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleProperty, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_names_round_trip() {
        for property in StyleProperty::ALL {
            assert_eq!(property.name().parse::<StyleProperty>().unwrap(), property);
        }
        assert!(matches!(
            "font-colour".parse::<StyleProperty>(),
            Err(StyleError::UnknownProperty(_))
        ));
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(
            PropertyValue::parse(StyleProperty::FontSize, "14px").unwrap(),
            PropertyValue::Length(14.0)
        );
        assert_eq!(
            PropertyValue::parse(StyleProperty::FontWeight, "bold").unwrap(),
            PropertyValue::Weight(FontWeight::BOLD)
        );
        assert_eq!(
            PropertyValue::parse(StyleProperty::TextAlign, "Center").unwrap(),
            PropertyValue::Align(TextAlign::Center)
        );
        assert_eq!(
            PropertyValue::parse(StyleProperty::FontFamily, "\"Fira Code\"").unwrap(),
            PropertyValue::Family("Fira Code".to_string())
        );
    }

    #[test]
    fn test_parse_invalid_values() {
        let err = PropertyValue::parse(StyleProperty::FontSize, "-3").unwrap_err();
        assert!(matches!(
            err,
            StyleError::InvalidValue { ref property, .. } if property == "font-size"
        ));
        assert!(PropertyValue::parse(StyleProperty::Color, "red").is_err());
        assert!(PropertyValue::parse(StyleProperty::LineHeight, "0").is_err());
    }

    #[test]
    fn test_property_map_parse() {
        let map = PropertyMap::parse([("font-weight", "700"), ("color", "#336699")]).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get(StyleProperty::FontWeight).and_then(PropertyValue::as_weight),
            Some(FontWeight::BOLD)
        );
        assert!(PropertyMap::parse([("nope", "1")]).is_err());
    }

    #[test]
    fn test_every_property_has_initial_value() {
        for property in StyleProperty::ALL {
            let value = property.initial_value();
            match property {
                StyleProperty::FontFamily => assert!(value.as_family().is_some()),
                StyleProperty::FontWeight => assert!(value.as_weight().is_some()),
                StyleProperty::FontStyle => assert!(value.as_font_style().is_some()),
                StyleProperty::TextAlign => assert!(value.as_align().is_some()),
                StyleProperty::Color
                | StyleProperty::BackgroundColor
                | StyleProperty::BorderColor => assert!(value.as_color().is_some()),
                _ => assert!(value.as_f32().is_some()),
            }
        }
    }
}
