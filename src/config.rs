//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\lyrics-minder\config.toml
//! - macOS: ~/Library/Application Support/lyrics-minder/config.toml
//! - Linux: ~/.config/lyrics-minder/config.toml
//!
//! The config file is human-readable and editable. Settings are loaded once
//! per command and read again at every reconciliation decision.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::lookup::{DEFAULT_BASE_URL, ResponseCache};
use crate::lyrics::ReconciliationPolicy;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lyrics behaviour
    pub lyrics: LyricsConfig,

    /// Remote lookup service
    pub lookup: LookupConfig,
}

/// The three user-facing lyrics switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    /// Fetch lyrics automatically when files are loaded
    pub auto_fetch_on_load: bool,

    /// Replace existing lyrics without asking
    pub auto_overwrite: bool,

    /// Create `<file>.lrc` next to audio files
    pub save_lrc_file: bool,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            auto_fetch_on_load: false,
            auto_overwrite: false,
            save_lrc_file: true,
        }
    }
}

impl LyricsConfig {
    /// Policy for one reconciliation.
    pub fn policy(&self, background: bool) -> ReconciliationPolicy {
        ReconciliationPolicy {
            auto_overwrite: self.auto_overwrite,
            persist_sidecar_file: self.save_lrc_file,
            is_background_load: background,
        }
    }

    /// Set a switch by its config-file name.
    pub fn set(&mut self, key: &str, value: bool) -> Result<(), ConfigError> {
        match key {
            "auto_fetch_on_load" => self.auto_fetch_on_load = value,
            "auto_overwrite" => self.auto_overwrite = value,
            "save_lrc_file" => self.save_lrc_file = value,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

/// Lookup service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Service root, e.g. a self-hosted LRCLIB mirror
    pub base_url: String,

    /// Keep responses on disk between runs
    pub cache: bool,

    /// Override for the response cache directory
    pub cache_dir: Option<PathBuf>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache: true,
            cache_dir: None,
        }
    }
}

impl LookupConfig {
    /// Build the response cache these settings describe.
    pub fn response_cache(&self) -> ResponseCache {
        if !self.cache {
            return ResponseCache::in_memory();
        }
        let dir = self
            .cache_dir
            .clone()
            .unwrap_or_else(ResponseCache::default_dir);
        ResponseCache::with_disk(dir)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lyrics-minder"))
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
    load_from(&path)
}

/// Load configuration from a specific file, falling back to defaults.
pub fn load_from(path: &std::path::Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Save configuration to a specific file.
pub fn save_to(config: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        // Ensure directory exists
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Unknown setting {0:?} (expected auto_fetch_on_load, auto_overwrite or save_lrc_file)")]
    UnknownKey(String),

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
