//! User settings for autobackup
//!
//! Manages preferences that shape a run but are not part of any backup plan:
//! where the plan file lives, notification behaviour, pauses and log level.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::BackupPaths;
use crate::error::BackupError;

/// Desktop notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Whether desktop notifications are shown
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Application name shown by the notification daemon
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            app_name: default_app_name(),
        }
    }
}

/// User settings for autobackup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Plan document to use instead of the one in the base directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_file: Option<PathBuf>,

    /// Desktop notification settings
    #[serde(default)]
    pub notifications: NotificationSettings,

    /// Pause after each progress update so the notification can redraw
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,

    /// Pause after creating a new backup location before writing into it
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_app_name() -> String {
    "Auto Backup".to_string()
}

fn default_step_delay_ms() -> u64 {
    100
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            plan_file: None,
            notifications: NotificationSettings::default(),
            step_delay_ms: default_step_delay_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_create(paths: &BackupPaths) -> Result<Self, BackupError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BackupError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BackupError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BackupPaths) -> Result<(), BackupError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BackupError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            BackupError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// The plan document this run should read
    pub fn resolve_plan_file(&self, paths: &BackupPaths) -> PathBuf {
        self.plan_file.clone().unwrap_or_else(|| paths.plan_file())
    }

    /// Pause between progress updates
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// Pause after creating a backup location
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
