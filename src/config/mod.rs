//! Configuration system for markquill.
//!
//! This module provides the configuration structure for markquill with sensible
//! defaults and support for serialization/deserialization via serde. Configuration
//! is loaded from a TOML file and merged with command-line arguments in `main`.
//!
//! # Example
//!
//! ```
//! use markquill::config::Config;
//!
//! // Use default configuration
//! let config = Config::default();
//! assert_eq!(config.default_label, "BOOKMARK");
//! assert_eq!(config.storage_key, "markquill.bookmarks");
//!
//! // Create custom configuration
//! let custom = Config {
//!     default_label: "TODO".to_string(),
//!     show_panel: true,
//!     ..Config::default()
//! };
//! assert!(custom.show_panel);
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::bookmark::record::DEFAULT_LABEL;
use crate::session::SessionOptions;
use crate::storage::{FileStore, DEFAULT_STORAGE_KEY};

/// Configuration for the markquill application.
///
/// All fields have sensible defaults via `Config::default()`, and any field
/// missing from the config file falls back to its default.
///
/// # Fields
///
/// * `theme` - Color scheme name (default: "default-dark")
/// * `storage_key` - Key the bookmarks are stored under (default: "markquill.bookmarks")
/// * `storage_path` - Bookmark store file (default: `~/.config/markquill/storage.json`)
/// * `default_label` - Label given to new bookmarks (default: "BOOKMARK")
/// * `show_panel` - Open the bookmarks panel at startup (default: false)
/// * `view_all_documents` - Panel lists bookmarks of every document (default: false)
/// * `panel_height` - Height of the bookmarks panel in rows (default: 10)
/// * `show_line_numbers` - Display line numbers in the text view (default: true)
/// * `create_backup` - Create .bak files before saving documents (default: false)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Color scheme name
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Key the bookmarks are stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Bookmark store file; `None` uses the default location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,

    /// Label given to new bookmarks
    #[serde(default = "default_label")]
    pub default_label: String,

    /// Open the bookmarks panel at startup
    #[serde(default)]
    pub show_panel: bool,

    /// Panel lists bookmarks of every document, not just the displayed one
    #[serde(default)]
    pub view_all_documents: bool,

    /// Height of the bookmarks panel in rows
    #[serde(default = "default_panel_height")]
    pub panel_height: u16,

    /// Display line numbers in the text view
    #[serde(default = "default_show_line_numbers")]
    pub show_line_numbers: bool,

    /// Create .bak files before saving
    #[serde(default)]
    pub create_backup: bool,
}

/// Returns the default theme name.
fn default_theme() -> String {
    "default-dark".to_string()
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

/// Returns the default panel height.
fn default_panel_height() -> u16 {
    10
}

/// Returns the default for showing line numbers.
fn default_show_line_numbers() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            storage_key: default_storage_key(),
            storage_path: None,
            default_label: default_label(),
            show_panel: false,
            view_all_documents: false,
            panel_height: default_panel_height(),
            show_line_numbers: default_show_line_numbers(),
            create_backup: false,
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/markquill/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("markquill");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, toml_string)?;

        Ok(())
    }

    /// Where the bookmark store lives: the configured path, or the default.
    pub fn resolved_storage_path(&self) -> Option<PathBuf> {
        self.storage_path.clone().or_else(FileStore::default_path)
    }

    /// Session parameters derived from this configuration.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            storage_key: self.storage_key.clone(),
            default_label: self.default_label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_path_override_wins() {
        let config = Config {
            storage_path: Some(PathBuf::from("/tmp/marks.json")),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_storage_path(),
            Some(PathBuf::from("/tmp/marks.json"))
        );
    }

    #[test]
    fn test_session_options_follow_config() {
        let config = Config {
            default_label: "NOTE".to_string(),
            storage_key: "k".to_string(),
            ..Default::default()
        };
        let options = config.session_options();
        assert_eq!(options.default_label, "NOTE");
        assert_eq!(options.storage_key, "k");
    }
}
