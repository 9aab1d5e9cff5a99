//! Path management for autobackup
//!
//! Resolves where the settings file, the plan file and the log files live.
//!
//! ## Path Resolution Order
//!
//! 1. `AUTOBACKUP_HOME` environment variable (if set)
//! 2. The platform configuration directory reported by the `directories` crate
//!    (`~/.config/autobackup` on Linux, `%APPDATA%\autobackup\config` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::BackupError;

/// Name of the plan document inside the base directory
pub const PLAN_FILE_NAME: &str = "AutoBackupConfig.xml";

/// Manages all paths used by autobackup
#[derive(Debug, Clone)]
pub struct BackupPaths {
    /// Base directory for all autobackup files
    base_dir: PathBuf,
}

impl BackupPaths {
    /// Create a new BackupPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, BackupError> {
        let base_dir = if let Ok(custom) = std::env::var("AUTOBACKUP_HOME") {
            PathBuf::from(custom)
        } else {
            ProjectDirs::from("", "", "autobackup")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    BackupError::Config("Could not determine a home directory".into())
                })?
        };

        Ok(Self { base_dir })
    }

    /// Create BackupPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the default path of the plan document
    pub fn plan_file(&self) -> PathBuf {
        self.base_dir.join(PLAN_FILE_NAME)
    }

    /// Get the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Ensure the base and log directories exist
    pub fn ensure_directories(&self) -> Result<(), BackupError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BackupError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.log_dir())
            .map_err(|e| BackupError::Io(format!("Failed to create log directory: {}", e)))?;

        Ok(())
    }
}
