//! Importer settings with persistence
//!
//! Settings are saved to `~/.config/scenemesh/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use scenemesh_assets::ImportOptions;
use serde::{Deserialize, Serialize};
use tracing::info;

/// All persisted settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub import: ImportOptions,
    pub log: LogSettings,
}

impl AppSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("scenemesh"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from the user config directory.
    ///
    /// Falls back to defaults when the file is missing or unusable; the
    /// second value carries the problem so it can be logged once a
    /// subscriber is installed.
    pub fn load() -> (Self, Option<anyhow::Error>) {
        let Some(path) = Self::settings_path() else {
            return (
                Self::default(),
                Some(anyhow::anyhow!("Could not determine config directory")),
            );
        };
        Self::load_from(&path)
    }

    /// Load settings from `path`, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> (Self, Option<anyhow::Error>) {
        match Self::read_from(path) {
            Ok(Some(settings)) => (settings, None),
            Ok(None) => (Self::default(), None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Read `path`, returning `None` when no settings file exists
    fn read_from(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {:?}", path))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {:?}", path))?;
        Ok(Some(settings))
    }

    /// Save settings to the user config directory
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = Self::settings_path() else {
            anyhow::bail!("Could not determine config directory");
        };
        self.save_to(&path)
    }

    /// Save settings to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Maximum level: trace, debug, info, warn or error
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
