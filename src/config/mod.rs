//! Configuration system for yaxi.
//!
//! This module provides the configuration structure for the `yaxi` command
//! with sensible defaults and support for serialization/deserialization via
//! serde. Configuration is loaded from a TOML file and merged with
//! command-line arguments.
//!
//! # Example
//!
//! ```
//! use yaxi::config::{Config, OutputFormat};
//!
//! // Use default configuration
//! let config = Config::default();
//! assert!(config.trim_text);
//! assert_eq!(config.output_format, OutputFormat::Text);
//!
//! // Create custom configuration
//! let custom = Config {
//!     output_format: OutputFormat::Json,
//!     ..Config::default()
//! };
//! assert!(custom.pretty_json);
//! ```

use serde::{Deserialize, Serialize};

use crate::document::parser::ParseOptions;

/// How query results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tags, attribute values and text, one per line.
    #[default]
    Text,
    /// Matched nodes in the portable JSON form.
    Json,
}

/// Configuration for the yaxi command.
///
/// All fields have sensible defaults via `Config::default()`.
///
/// # Fields
///
/// * `trim_text` - Trim whitespace around element text when parsing (default: true)
/// * `output_format` - `text` or `json` (default: text)
/// * `pretty_json` - Indent JSON output (default: true)
/// * `log_filter` - `tracing` filter used when `RUST_LOG` is unset (default: "warn")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Trim whitespace around element text when parsing
    #[serde(default = "default_trim_text")]
    pub trim_text: bool,

    /// Output format for query results
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Indent JSON output
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,

    /// Log filter directive, e.g. "yaxi=debug"
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

/// Returns the default for trimming element text.
fn default_trim_text() -> bool {
    true
}

/// Returns the default for indenting JSON output.
fn default_pretty_json() -> bool {
    true
}

/// Returns the default log filter.
fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trim_text: default_trim_text(),
            output_format: OutputFormat::default(),
            pretty_json: default_pretty_json(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/yaxi/config.toml` on all platforms.
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("yaxi");
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
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|_| Self::default()),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Parser options derived from this configuration.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            trim_text: self.trim_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_text_default() {
        let config = Config::default();
        assert!(config.trim_text);
        assert!(config.parse_options().trim_text);
    }

    #[test]
    fn test_trim_text_can_be_disabled() {
        let config = Config {
            trim_text: false,
            ..Default::default()
        };
        assert!(!config.parse_options().trim_text);
    }
}
