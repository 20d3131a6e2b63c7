use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::UnitSystem;

/// Top-level configuration stored on disk.
///
/// A missing OpenWeather key is a valid state: queries then skip the primary
/// provider and go straight to the keyless fallback.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// openweather_api_key = "..."
    pub openweather_api_key: Option<String>,

    /// Optional default unit system, "metric" or "imperial".
    pub default_units: Option<String>,
}

impl Config {
    pub fn openweather_api_key(&self) -> Option<&str> {
        self.openweather_api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    pub fn set_openweather_api_key(&mut self, api_key: String) {
        let trimmed = api_key.trim();
        self.openweather_api_key =
            if trimmed.is_empty() { None } else { Some(trimmed.to_string()) };
    }

    /// Unit system to use when the caller does not specify one. An
    /// unrecognized stored value falls back to metric rather than failing.
    pub fn default_units(&self) -> UnitSystem {
        self.default_units
            .as_deref()
            .and_then(|s| UnitSystem::try_from(s).ok())
            .unwrap_or(UnitSystem::Metric)
    }

    pub fn set_default_units(&mut self, units: UnitSystem) {
        self.default_units = Some(units.as_str().to_string());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "wxboard", "wxboard-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
