//! Retention store
//!
//! The directory holding every stored version of every item of one backup
//! plan. The store only knows how entries are named; rotation and eviction
//! live in the backup engine.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BackupError, BackupResult};
use crate::models::{BackupPlan, Generation, RetentionEntry, RetentionKind};

/// On-disk directory of retained versions for one plan
#[derive(Debug, Clone)]
pub struct RetentionStore {
    root: PathBuf,
}

impl RetentionStore {
    /// Open the store at `root` (nothing is touched on disk)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open the store a plan writes to
    pub fn for_plan(plan: &BackupPlan) -> Self {
        Self::new(plan.destination.clone())
    }

    /// Store directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the store directory if needed
    ///
    /// Returns `true` when the directory was newly created.
    pub fn ensure_exists(&self) -> BackupResult<bool> {
        if self.root.is_dir() {
            return Ok(false);
        }

        fs::create_dir_all(&self.root).map_err(|e| BackupError::DestinationUnavailable {
            path: self.root.clone(),
            reason: e.to_string(),
        })?;

        Ok(true)
    }

    /// Path of the entry for `base_name` at `generation`
    pub fn entry_path(&self, base_name: &str, generation: &Generation) -> PathBuf {
        self.root
            .join(RetentionEntry::file_name(base_name, generation))
    }

    /// Path a new version of `base_name` is copied to before it is promoted
    ///
    /// The leading dot and trailing `.staging` keep it from ever matching a
    /// generation pattern.
    pub fn staging_path(&self, base_name: &str) -> PathBuf {
        self.root.join(format!(".{}.staging", base_name))
    }

    /// All entries stored for `base_name`, newest first
    ///
    /// Files that do not match `<base_name>.<generation>` exactly are ignored.
    /// A store that does not exist yet has no entries.
    pub fn entries_for(
        &self,
        base_name: &str,
        kind: RetentionKind,
    ) -> BackupResult<Vec<RetentionEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();

        for dir_entry in fs::read_dir(&self.root).map_err(|e| {
            BackupError::Io(format!(
                "Failed to read backup location {}: {}",
                self.root.display(),
                e
            ))
        })? {
            let dir_entry = dir_entry.map_err(|e| {
                BackupError::Io(format!("Failed to read directory entry: {}", e))
            })?;

            let path = dir_entry.path();
            if !path.is_file() {
                continue;
            }

            let file_name = dir_entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };

            if let Some(generation) = RetentionEntry::match_file_name(base_name, file_name, kind)
            {
                entries.push(RetentionEntry {
                    base_name: base_name.to_string(),
                    generation,
                    path,
                });
            }
        }

        sort_newest_first(&mut entries);
        Ok(entries)
    }

    /// Entries for every tracked item of `plan`, in plan order
    pub fn list_tracked(
        &self,
        plan: &BackupPlan,
    ) -> BackupResult<Vec<(String, Vec<RetentionEntry>)>> {
        plan.base_names()
            .into_iter()
            .map(|name| {
                let entries = self.entries_for(&name, plan.retention_kind)?;
                Ok((name, entries))
            })
            .collect()
    }
}

/// Generation 0 first for numbered entries, latest date first for dated ones
fn sort_newest_first(entries: &mut [RetentionEntry]) {
    entries.sort_by(|a, b| match (&a.generation, &b.generation) {
        (Generation::Date(x), Generation::Date(y)) => y.cmp(x),
        (x, y) => x.cmp(y),
    });
}
