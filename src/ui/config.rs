//! # Configuration Persistence
//!
//! Manages user configuration stored in `~/.config/studyblock/config.json`.
//!
//! ## Overview
//!
//! The [`Config`] struct is serialized to / deserialized from a JSON file in
//! the user's XDG config directory. Every field has a default, so a partial
//! file (or no file at all) is valid:
//!
//! ```json
//! {
//!   "theme": "Nord",
//!   "zoom": 2.0,
//!   "rounding": "truncate",
//!   "refresh_seconds": 60,
//!   "daily_goal": { "quantity": 7, "block_size": 60 }
//! }
//! ```
//!
//! Command-line flags override these values for a single run.

use crate::layout::{RoundingPolicy, ZoomLevel};
use crate::source::DailyGoal;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Persisted user configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The name of the selected theme (must match a built-in theme name).
    #[serde(default = "default_theme_name")]
    pub theme: String,
    /// Initial zoom, snapped to the supported 1x-4x range.
    #[serde(default)]
    pub zoom: ZoomLevel,
    /// How fractional grid positions are turned into rows.
    #[serde(default)]
    pub rounding: RoundingPolicy,
    /// How often the "now" line and ongoing blocks advance.
    #[serde(default = "default_refresh_seconds")]
    pub refresh_seconds: u64,
    /// Blocks and block length the footer tracks progress against.
    #[serde(default)]
    pub daily_goal: DailyGoal,
}

fn default_theme_name() -> String {
    "Catppuccin Mocha".to_string()
}

fn default_refresh_seconds() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            zoom: ZoomLevel::default(),
            rounding: RoundingPolicy::default(),
            refresh_seconds: default_refresh_seconds(),
            daily_goal: DailyGoal::default(),
        }
    }
}

impl Config {
    /// Load configuration from disk. Returns `Config::default()` if the file
    /// does not exist or cannot be parsed.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Falling back to default config: {:#}", e);
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the current configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Refresh interval, never shorter than one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_seconds.max(1))
    }

    fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "studyblock")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.json"))
    }
}
