//! Custom error types for autobackup
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.
//!
//! Errors fall into two groups. Item failures (`Copy`, `Archive`) are caught by
//! the rotation engines, reported, and never abort a plan. Structural failures
//! (`Config`, `Xml`, `Validation`) are fatal for the whole run.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for autobackup operations
#[derive(Error, Debug)]
pub enum BackupError {
    /// Configuration-related errors (missing or unreadable settings/plan file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Plan document could not be parsed
    #[error("Plan file error: {0}")]
    Xml(String),

    /// A plan parsed but is not usable as written
    #[error("Validation error: {0}")]
    Validation(String),

    /// Copying or renaming one tracked item failed
    #[error("Failed to back up {item}: {reason}")]
    Copy { item: String, reason: String },

    /// Archiving a tracked directory failed
    #[error("Failed to archive {}: {reason}", directory.display())]
    Archive { directory: PathBuf, reason: String },

    /// The retention store directory could not be created
    #[error("Backup location unavailable {}: {reason}", path.display())]
    DestinationUnavailable { path: PathBuf, reason: String },

    /// Desktop notification could not be delivered
    #[error("Notification error: {0}")]
    Notification(String),
}

impl BackupError {
    /// Create a copy failure for a tracked item
    pub fn copy(item: impl Into<String>, reason: impl ToString) -> Self {
        Self::Copy {
            item: item.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an archive failure for a tracked directory
    pub fn archive(directory: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Archive {
            directory: directory.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if this error only affects a single tracked item
    pub fn is_item_failure(&self) -> bool {
        matches!(self, Self::Copy { .. } | Self::Archive { .. })
    }

    /// Check if this error must stop the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Xml(_) | Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BackupError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<quick_xml::Error> for BackupError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

/// Result type alias for autobackup operations
pub type BackupResult<T> = Result<T, BackupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackupError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_copy_error() {
        let err = BackupError::copy("notes.txt", "disk full");
        assert_eq!(err.to_string(), "Failed to back up notes.txt: disk full");
        assert!(err.is_item_failure());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_destination_error_display() {
        let err = BackupError::DestinationUnavailable {
            path: PathBuf::from("/backups/work"),
            reason: "permission denied".into(),
        };
        assert_eq!(
            err.to_string(),
            "Backup location unavailable /backups/work: permission denied"
        );
        assert!(!err.is_item_failure());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_config_errors_are_fatal() {
        assert!(BackupError::Xml("bad".into()).is_fatal());
        assert!(BackupError::Validation("bad".into()).is_fatal());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BackupError = io_err.into();
        assert!(matches!(err, BackupError::Io(_)));
    }
}
