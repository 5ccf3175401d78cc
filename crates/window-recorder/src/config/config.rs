//! Configuration management for window-recorder.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{OutputConfig, UiConfig},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Recording output settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Recorder window state.
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Location of the configuration file in the platform config directory.
    #[track_caller]
    pub fn default_path() -> AppResult<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "window-recorder", "Window-Recorder")
            .ok_or_else(|| AppError::ConfigError {
                reason: "Failed to get config directory".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from `path`, creating a default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config = Self::parse(&contents)?;

            info!(config_path = ?path, "Configuration loaded");

            Ok(config)
        } else {
            info!("No config found, creating default");
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Parse configuration from TOML text. Missing sections take their defaults.
    #[track_caller]
    pub fn parse(contents: &str) -> AppResult<Self> {
        toml::from_str(contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Save configuration to `path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path
            .parent()
            .filter(|d| !d.as_os_str().is_empty() && !d.exists())
        {
            fs::create_dir_all(dir)?;
            debug!(config_dir = ?dir, "Created config directory");
        }

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Atomic write: write to temp file then rename
        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Output directory for recordings, created if it does not exist yet.
    #[track_caller]
    pub fn prepare_output_dir(&self) -> AppResult<PathBuf> {
        let dir = &self.output.directory;

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to create output directory {:?}: {}", dir, e),
                location: ErrorLocation::from(Location::caller()),
            })?;
            info!(output_dir = ?dir, "Created output directory");
        }

        Ok(dir.clone())
    }
}
