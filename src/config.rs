//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\tagsort\config.toml
//! - macOS: ~/Library/Application Support/tagsort/config.toml
//! - Linux: ~/.config/tagsort/config.toml
//!
//! Every field has a default, so a partial file (or no file at all) is fine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::organizer::sanitize_component;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Naming and scanning rules for `organize`
    pub organize: OrganizeConfig,
}

/// Naming and scanning rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizeConfig {
    /// Directory name used when a file has no artist
    pub unknown_artist: String,

    /// Directory name used when an album sanitizes to nothing
    pub unknown_album: String,

    /// File stem used when a title sanitizes to nothing
    pub unknown_title: String,

    /// Separator between artist and title when guessing from filenames
    pub guess_separator: String,

    /// File extensions (case-insensitive) treated as audio
    pub extensions: Vec<String>,
}

impl Default for OrganizeConfig {
    fn default() -> Self {
        Self {
            unknown_artist: "Unknown Artist".to_string(),
            unknown_album: "Unknown Album".to_string(),
            unknown_title: "Unknown Title".to_string(),
            guess_separator: " - ".to_string(),
            extensions: ["mp3", "flac", "ogg", "opus", "m4a", "wav", "aiff", "ape", "wv"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl OrganizeConfig {
    /// Reject values that would make planning produce unsafe paths.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("unknown_artist", &self.unknown_artist),
            ("unknown_album", &self.unknown_album),
            ("unknown_title", &self.unknown_title),
        ] {
            let trimmed = value.trim();
            if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
                return Err(Error::Config(format!("organize.{name} must be a usable name")));
            }
            let cleaned = sanitize_component(value, value);
            if cleaned != *value {
                return Err(Error::Config(format!(
                    "organize.{name} must be a plain file name (try {cleaned:?})"
                )));
            }
        }
        if self.guess_separator.trim().is_empty() {
            return Err(Error::Config(
                "organize.guess_separator must not be blank".to_string(),
            ));
        }
        if self.extensions.is_empty() {
            return Err(Error::Config(
                "organize.extensions must list at least one extension".to_string(),
            ));
        }
        Ok(())
    }

    /// Check if a path has one of the configured audio extensions
    pub fn is_audio_file(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tagsort"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => parse(&contents).unwrap_or_else(|e| {
            tracing::error!("Failed to parse config file {:?}: {}", path, e);
            tracing::warn!("Using default configuration");
            Config::default()
        }),
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Parse a config document.
pub fn parse(contents: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(contents)
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> std::result::Result<PathBuf, ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("config.toml");

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDir(dir.clone(), e))?;

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(path)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
