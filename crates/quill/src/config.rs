//! Editor configuration loaded from TOML.
//!
//! ```toml
//! multiline = true
//! autocomplete_lookback = 16
//! caret_width = 2.0
//!
//! [theme]
//! selection = "#3390FF66"
//! caret = "#000000"
//!
//! [keymap]
//! "control-h" = "style:heading"
//! "control-b" = "none"
//!
//! [styles.warning]
//! color = "#CC0000"
//! font-weight = "bold"
//! ```
//!
//! A keymap action of `"none"` removes the default binding for that combo.

use std::collections::BTreeMap;
use std::path::Path;

use quill_core::document::Frame;
use quill_core::logging::targets;
use quill_core::style::PropertyMap;
use quill_core::types::Color;
use quill_render::painter::Theme;
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::keymap::Keymap;

const UNBIND: &str = "none";

/// Session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Whether enter splits blocks. Single-line sessions call the enter action instead.
    pub multiline: bool,
    /// Characters before the caret passed to the completion source.
    pub autocomplete_lookback: usize,
    pub caret_width: f32,
    pub theme: ThemeConfig,
    /// Combo to action overrides on top of the default keymap.
    pub keymap: BTreeMap<String, String>,
    /// Extra named styles as property name to value strings.
    pub styles: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            multiline: true,
            autocomplete_lookback: 16,
            caret_width: 2.0,
            theme: ThemeConfig::default(),
            keymap: BTreeMap::new(),
            styles: BTreeMap::new(),
        }
    }
}

/// Hex colour overrides for the painter theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub selection: Option<String>,
    pub caret: Option<String>,
    pub current_line: Option<String>,
    pub popup_background: Option<String>,
    pub popup_text: Option<String>,
    pub popup_border: Option<String>,
}

impl EditorConfig {
    /// Parse and validate a configuration.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| EditorError::config(path, e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EditorError::ConfigParse(e.to_string()))
    }

    /// Check every keymap entry, theme colour, and style.
    pub fn validate(&self) -> Result<()> {
        self.keymap()?;
        self.theme()?;
        for properties in self.styles.values() {
            parse_properties(properties)?;
        }
        Ok(())
    }

    /// The default keymap with this configuration's overrides applied.
    pub fn keymap(&self) -> Result<Keymap> {
        let mut keymap = Keymap::default();
        for (combo, action) in &self.keymap {
            if action == UNBIND {
                keymap.unbind(combo);
            } else {
                keymap.bind(combo, action)?;
            }
        }
        Ok(keymap)
    }

    /// The default theme with this configuration's colours applied.
    pub fn theme(&self) -> Result<Theme> {
        let mut theme = Theme::default();
        let colors = &self.theme;
        for (slot, value) in [
            (&mut theme.selection, &colors.selection),
            (&mut theme.caret, &colors.caret),
            (&mut theme.current_line, &colors.current_line),
            (&mut theme.popup_background, &colors.popup_background),
            (&mut theme.popup_text, &colors.popup_text),
            (&mut theme.popup_border, &colors.popup_border),
        ] {
            if let Some(hex) = value {
                *slot = Color::from_hex(hex)
                    .ok_or_else(|| EditorError::ConfigParse(format!("invalid colour '{hex}'")))?;
            }
        }
        Ok(theme)
    }

    /// Register the configured named styles in `frame`'s style sheet.
    pub fn apply_styles(&self, frame: &mut Frame) -> Result<()> {
        for (name, properties) in &self.styles {
            let map = parse_properties(properties)?;
            frame.styles_mut().insert(name.clone(), map);
            tracing::trace!(target: targets::CONFIG, name, "registered style");
        }
        Ok(())
    }
}

fn parse_properties(properties: &BTreeMap<String, String>) -> Result<PropertyMap> {
    Ok(PropertyMap::parse(
        properties.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::input::KeyEvent;
    use quill_core::style::StyleProperty;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::from_toml_str("").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert!(config.multiline);
        assert_eq!(config.autocomplete_lookback, 16);
        assert_eq!(config.theme().unwrap(), Theme::default());
    }

    #[test]
    fn test_overrides() {
        let config = EditorConfig::from_toml_str(
            r##"
            multiline = false
            autocomplete_lookback = 8

            [theme]
            caret = "#FF0000"

            [keymap]
            "control-h" = "style:heading"
            "control-b" = "none"
            "##,
        )
        .unwrap();
        assert!(!config.multiline);
        assert_eq!(config.autocomplete_lookback, 8);
        assert_eq!(config.theme().unwrap().caret, Color::from_rgb8(255, 0, 0));

        let keymap = config.keymap().unwrap();
        assert_eq!(
            keymap.resolve(&KeyEvent::char('h').with_control(), false),
            Some(Command::ApplyStyle { name: Some("heading".into()) })
        );
        assert_eq!(keymap.resolve(&KeyEvent::char('b').with_control(), false), None);
    }

    #[test]
    fn test_unbind_ignores_combo_case() {
        let config = EditorConfig::from_toml_str("[keymap]\n\"Control-B\" = \"none\"").unwrap();
        let keymap = config.keymap().unwrap();
        assert_eq!(keymap.resolve(&KeyEvent::char('b').with_control(), false), None);
        assert_eq!(keymap.action_for("meta-b"), Some("start-bold"));
    }

    #[test]
    fn test_invalid_entries() {
        assert!(matches!(
            EditorConfig::from_toml_str("[keymap]\n\"control-q\" = \"quit\""),
            Err(EditorError::UnknownAction(_))
        ));
        assert!(matches!(
            EditorConfig::from_toml_str("[theme]\ncaret = \"not-a-colour\""),
            Err(EditorError::ConfigParse(_))
        ));
        assert!(matches!(
            EditorConfig::from_toml_str("[styles.x]\nfont-size = \"huge\""),
            Err(EditorError::Style(_))
        ));
        assert!(matches!(
            EditorConfig::from_toml_str("multiline = 3"),
            Err(EditorError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_apply_styles() {
        let config = EditorConfig::from_toml_str(
            r##"
            [styles.warning]
            color = "#CC0000"
            font-weight = "bold"
            "##,
        )
        .unwrap();
        let mut frame = Frame::from_text("careful");
        config.apply_styles(&mut frame).unwrap();
        let warning = frame.styles().get("warning").unwrap();
        assert!(warning.contains(StyleProperty::Color));
        assert!(warning.contains(StyleProperty::FontWeight));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.toml");
        std::fs::write(&path, "caret_width = 3.5\n").unwrap();
        let config = EditorConfig::from_file(&path).unwrap();
        assert_eq!(config.caret_width, 3.5);

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            EditorConfig::from_file(&missing),
            Err(EditorError::Config { .. })
        ));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = EditorConfig::default();
        config.keymap.insert("control-h".into(), "style:heading".into());
        let text = config.to_toml_string().unwrap();
        assert_eq!(EditorConfig::from_toml_str(&text).unwrap(), config);
    }
}
