//! Error types for the editor crate.

use std::path::PathBuf;

use quill_core::{DocumentError, StyleError};
use quill_render::LayoutError;

/// Result type alias for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors that can occur while editing or configuring a session.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A document operation failed.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Layout or a render-tree lookup failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// A style value in the configuration was invalid.
    #[error(transparent)]
    Style(#[from] StyleError),

    /// The configuration file could not be read.
    #[error("Failed to read config '{path}': {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration text was not valid.
    #[error("Invalid config: {0}")]
    ConfigParse(String),

    /// A keymap entry names an action that does not exist.
    #[error("Unknown action '{0}'")]
    UnknownAction(String),
}

impl EditorError {
    /// Create a config read error.
    pub fn config(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Config {
            path: path.into(),
            source,
        }
    }
}

impl From<toml::de::Error> for EditorError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}
