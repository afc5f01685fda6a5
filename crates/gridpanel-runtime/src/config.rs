#![forbid(unsafe_code)]

//! Panel configuration files.
//!
//! Loads a [`PanelConfig`] from TOML or JSON. Every field is optional;
//! omitted fields keep their defaults and an omitted (or `null`) maximum is
//! unbounded. Loaded values are not coerced here: write them through
//! [`PlacementStore::apply_config`](crate::placement::PlacementStore::apply_config)
//! so the usual coercion and change hooks apply.
//!
//! # Example
//!
//! ```toml
//! aspect_ratio = 0.75
//! column_count = 6
//! max_row_size = 240.0
//! row_spacing = 4
//! ```
//!
//! # Failure Modes
//!
//! - **Unreadable file**: [`ConfigError::Io`].
//! - **Malformed document or wrong field type**: [`ConfigError::Toml`] /
//!   [`ConfigError::Json`].
//! - **Unknown file extension**: [`ConfigError::UnsupportedExtension`].

use std::path::Path;

use gridpanel_layout::PanelConfig;
use tracing::debug;

/// Parse a TOML document.
pub fn load_panel_config_toml(s: &str) -> Result<PanelConfig, ConfigError> {
    toml::from_str(s).map_err(ConfigError::Toml)
}

/// Parse a JSON document.
pub fn load_panel_config_json(s: &str) -> Result<PanelConfig, ConfigError> {
    serde_json::from_str(s).map_err(ConfigError::Json)
}

/// Load a file, choosing the format from its extension (`toml` or `json`).
pub fn load_panel_config_file(path: impl AsRef<Path>) -> Result<PanelConfig, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let parse: fn(&str) -> Result<PanelConfig, ConfigError> = match extension.as_str() {
        "toml" => load_panel_config_toml,
        "json" => load_panel_config_json,
        _ => return Err(ConfigError::UnsupportedExtension(extension)),
    };

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config = parse(&content)?;
    debug!(path = %path.display(), format = %extension, "panel config loaded");
    Ok(config)
}

/// Errors from loading a panel configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// The file extension names no supported format.
    UnsupportedExtension(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::UnsupportedExtension(ext) if ext.is_empty() => {
                write!(f, "config file has no extension (expected .toml or .json)")
            }
            Self::UnsupportedExtension(ext) => {
                write!(f, "unsupported config extension `.{ext}` (expected .toml or .json)")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::UnsupportedExtension(_) => None,
        }
    }
}
