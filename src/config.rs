//! Configuration file support.
//!
//! Serializes user preferences to JSON under the platform config directory,
//! with per-field defaults so older files keep loading after new fields are
//! added.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BRUSH_SIZE_MAX, BRUSH_SIZE_MIN, DEFAULT_BRUSH_COLOR, DEFAULT_BRUSH_SIZE, DEFAULT_UNDO_DEPTH,
};

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Errors that can occur while loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Application configuration that can be exported and imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,
}

fn default_app_name() -> String {
    "vastumark".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
        }
    }
}

impl AppConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Load a config file, falling back to defaults with a logged warning.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if path.exists() {
                    log::warn!("Failed to load config {path:?}: {e}; using defaults");
                }
                Self::default()
            }
        }
    }

    /// Save the config as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Default config file location under the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vastumark").join("config.json"))
    }
}

/// User preferences section of the config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Logging verbosity when RUST_LOG is not set
    #[serde(default)]
    pub log_level: LogLevel,

    /// Free-hand brush color as a hex string
    #[serde(default = "default_brush_color")]
    pub brush_color: String,

    /// Free-hand brush stroke width
    #[serde(default = "default_brush_size")]
    pub brush_size: f32,

    /// Undo history depth cap
    #[serde(default = "default_undo_depth")]
    pub undo_depth: usize,

    /// Remote guidance sheet CSV export URL, if configured
    #[serde(default)]
    pub guidance_sheet_url: Option<String>,
}

fn default_brush_color() -> String {
    "#e11d48".to_string()
}

fn default_brush_size() -> f32 {
    DEFAULT_BRUSH_SIZE
}

fn default_undo_depth() -> usize {
    DEFAULT_UNDO_DEPTH
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            brush_color: default_brush_color(),
            brush_size: default_brush_size(),
            undo_depth: default_undo_depth(),
            guidance_sheet_url: None,
        }
    }
}

impl UserPreferences {
    /// Brush color as RGBA, falling back to the default on a bad hex string.
    pub fn brush_rgba(&self) -> [u8; 4] {
        parse_hex_color(&self.brush_color).unwrap_or(DEFAULT_BRUSH_COLOR)
    }

    /// Brush size clamped to the supported range.
    pub fn clamped_brush_size(&self) -> f32 {
        self.brush_size.clamp(BRUSH_SIZE_MIN, BRUSH_SIZE_MAX)
    }
}

/// Parse `#rrggbb` or `#rrggbbaa` into RGBA.
pub fn parse_hex_color(hex: &str) -> Option<[u8; 4]> {
    let hex = hex.trim().strip_prefix('#')?;
    if hex.len() != 6 && hex.len() != 8 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    let a = if hex.len() == 8 {
        u8::from_str_radix(&hex[6..8], 16).ok()?
    } else {
        0xff
    };
    Some([r, g, b, a])
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.preferences.brush_rgba(), DEFAULT_BRUSH_COLOR);
        assert_eq!(config.preferences.undo_depth, DEFAULT_UNDO_DEPTH);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"version": 1, "preferences": {"brush_size": 12.0}}"#).unwrap();
        assert_eq!(config.app_name, "vastumark");
        assert_eq!(config.preferences.brush_size, 12.0);
        assert_eq!(config.preferences.brush_color, "#e11d48");
        assert_eq!(config.preferences.log_level, LogLevel::Info);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let path = std::env::temp_dir()
            .join("vastumark-config-test")
            .join("config.json");
        let mut config = AppConfig::default();
        config.preferences.brush_color = "#2563eb".to_string();
        config.preferences.undo_depth = 25;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.preferences.brush_color, "#2563eb");
        assert_eq!(loaded.preferences.undo_depth, 25);
        assert_eq!(loaded.preferences.brush_rgba(), [0x25, 0x63, 0xeb, 0xff]);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let config = AppConfig::load_or_default(Path::new("/nonexistent/config.json"));
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#e11d48"), Some([0xe1, 0x1d, 0x48, 0xff]));
        assert_eq!(parse_hex_color("#11182780"), Some([0x11, 0x18, 0x27, 0x80]));
        assert_eq!(parse_hex_color("e11d48"), None);
        assert_eq!(parse_hex_color("#xyz"), None);
    }
}
