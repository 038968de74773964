//! Engine configuration.
//!
//! TOML-backed settings for the sync window and the reminder cadence.
//! A missing file yields the defaults; a malformed file is a load error.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sync: SyncConfig,
    pub reminders: ReminderConfig,
}

/// Settings for the sync engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Days before "now" covered by the bidirectional import window.
    pub window_days_past: i64,
    /// Days after "now" covered by the bidirectional import window.
    pub window_days_future: i64,
    /// Per-request budget handed to the calendar provider, in seconds.
    pub timeout_secs: u64,
}

/// Settings for the reminder scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Seconds between scheduler scans.
    pub poll_interval_secs: u64,
    /// Half-width of the trigger window around a reminder's fire time,
    /// in seconds.
    pub trigger_window_secs: i64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            window_days_past: 7,
            window_days_future: 30,
            timeout_secs: 30,
        }
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
            trigger_window_secs: 60,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sync: SyncConfig::default(),
            reminders: ReminderConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save configuration as pretty TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
