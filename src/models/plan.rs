//! Backup plan model
//!
//! A plan is one configured backup job: what to save, where to save it, and
//! how many old versions to keep.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{BackupError, BackupResult};

/// How old versions in a retention store are named and evicted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionKind {
    /// Integer generations, 0 = newest (`retain_type="number"`)
    ByCount,
    /// Date-stamped versions (`retain_type="days"`)
    ByAge,
}

impl RetentionKind {
    /// Parse a retention kind from its plan file spelling
    ///
    /// Only `number` and `days` are accepted, exactly as written.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "number" => Some(Self::ByCount),
            "days" => Some(Self::ByAge),
            _ => None,
        }
    }
}

impl fmt::Display for RetentionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByCount => write!(f, "number"),
            Self::ByAge => write!(f, "days"),
        }
    }
}

/// A directory that is archived into a single file before rotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedDirectory {
    /// Name the archive is stored under in the retention store
    pub save_as: String,
    /// Directory to archive
    pub source: PathBuf,
}

impl TrackedDirectory {
    /// Track a directory, storing it under its own base name unless `save_as` is given
    pub fn new(source: impl Into<PathBuf>, save_as: Option<&str>) -> Self {
        let source = source.into();
        let save_as = match save_as.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => base_name(&source).unwrap_or_default(),
        };
        Self { save_as, source }
    }
}

/// One configured backup job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupPlan {
    /// Retention style for this plan
    pub retention_kind: RetentionKind,

    /// Highest generation kept, or oldest age in days kept
    pub retention_threshold: u32,

    /// Retention store directory
    pub destination: PathBuf,

    /// Files copied as-is
    pub tracked_files: Vec<PathBuf>,

    /// Directories archived before copying
    pub tracked_directories: Vec<TrackedDirectory>,
}

impl BackupPlan {
    /// Create an empty plan
    pub fn new(
        retention_kind: RetentionKind,
        retention_threshold: u32,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            retention_kind,
            retention_threshold,
            destination: destination.into(),
            tracked_files: Vec::new(),
            tracked_directories: Vec::new(),
        }
    }

    /// Add a tracked file
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tracked_files.push(path.into());
        self
    }

    /// Add a tracked directory
    pub fn with_directory(mut self, path: impl Into<PathBuf>, save_as: Option<&str>) -> Self {
        self.tracked_directories
            .push(TrackedDirectory::new(path, save_as));
        self
    }

    /// Number of tracked files plus tracked directories
    pub fn item_count(&self) -> usize {
        self.tracked_files.len() + self.tracked_directories.len()
    }

    /// Names every tracked item occupies in the retention store
    ///
    /// Files whose path has no final component are skipped; `validate`
    /// rejects such plans.
    pub fn base_names(&self) -> Vec<String> {
        self.tracked_files
            .iter()
            .filter_map(|path| base_name(path))
            .chain(self.tracked_directories.iter().map(|d| d.save_as.clone()))
            .collect()
    }

    /// Check that the plan can be run without ambiguity
    pub fn validate(&self) -> BackupResult<()> {
        if self.retention_threshold == 0 {
            return Err(BackupError::Validation(format!(
                "Plan for {} must retain at least 1",
                self.destination.display()
            )));
        }

        if self.destination.as_os_str().is_empty() {
            return Err(BackupError::Validation(
                "Plan has no backup location".into(),
            ));
        }

        let mut seen = HashSet::new();

        for file in &self.tracked_files {
            let name = base_name(file).ok_or_else(|| {
                BackupError::Validation(format!("Not a file path: {}", file.display()))
            })?;
            if !seen.insert(name.clone()) {
                return Err(self.collision(&name));
            }
        }

        for dir in &self.tracked_directories {
            if dir.save_as.is_empty() || dir.save_as.contains(['/', '\\']) {
                return Err(BackupError::Validation(format!(
                    "Invalid save_as name '{}' for {}",
                    dir.save_as,
                    dir.source.display()
                )));
            }
            if !seen.insert(dir.save_as.clone()) {
                return Err(self.collision(&dir.save_as));
            }
        }

        Ok(())
    }

    fn collision(&self, name: &str) -> BackupError {
        BackupError::Validation(format!(
            "More than one item is saved as '{}' in {}",
            name,
            self.destination.display()
        ))
    }
}

/// Final path component as a string
pub fn base_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .filter(|name| !name.is_empty())
}
