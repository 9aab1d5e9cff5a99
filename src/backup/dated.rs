//! Dated rotation
//!
//! Each run stores `<base_name>.<YYYY-MM-DD>` for the run date. A second run
//! on the same day replaces that day's version; older days are left alone.

use chrono::NaiveDate;

use super::WorkItem;
use crate::error::{BackupError, BackupResult};
use crate::models::{Generation, RetentionEntry};
use crate::notify::ProgressReporter;
use crate::storage::{promote, stage_copy, RetentionStore};

/// Store today's version of `item`
pub fn rotate(
    store: &RetentionStore,
    item: &WorkItem,
    today: NaiveDate,
    reporter: &dyn ProgressReporter,
) -> BackupResult<RetentionEntry> {
    let base_name = item.base_name.as_str();
    let staging = store.staging_path(base_name);

    reporter.report("Backing up files...", &format!("Saving {}", base_name));
    stage_copy(&item.source, &staging).map_err(|e| BackupError::copy(base_name, e))?;

    let generation = Generation::Date(today);
    let target = store.entry_path(base_name, &generation);
    promote(&staging, &target).map_err(|e| BackupError::copy(base_name, e))?;

    tracing::debug!(item = base_name, path = %target.display(), "stored dated version");

    Ok(RetentionEntry {
        base_name: base_name.to_string(),
        generation,
        path: target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RetentionKind;
    use crate::notify::MemoryReporter;
    use std::fs;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_stores_under_date_suffix() {
        let store_dir = TempDir::new().unwrap();
        let src = TempDir::new().unwrap();
        let store = RetentionStore::new(store_dir.path());
        let source = src.path().join("db.sqlite");
        fs::write(&source, "data").unwrap();

        let entry = rotate(
            &store,
            &WorkItem::file("db.sqlite", source),
            day(15),
            &MemoryReporter::new(),
        )
        .unwrap();

        assert_eq!(entry.path, store_dir.path().join("db.sqlite.2024-01-15"));
        assert_eq!(fs::read_to_string(&entry.path).unwrap(), "data");
    }

    #[test]
    fn test_same_day_overwrites() {
        let store_dir = TempDir::new().unwrap();
        let src = TempDir::new().unwrap();
        let store = RetentionStore::new(store_dir.path());
        let source = src.path().join("a.txt");
        let item = WorkItem::file("a.txt", source.clone());
        let reporter = MemoryReporter::new();

        fs::write(&source, "morning").unwrap();
        rotate(&store, &item, day(15), &reporter).unwrap();
        fs::write(&source, "evening").unwrap();
        rotate(&store, &item, day(15), &reporter).unwrap();
        fs::write(&source, "next day").unwrap();
        rotate(&store, &item, day(16), &reporter).unwrap();

        let entries = store.entries_for("a.txt", RetentionKind::ByAge).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            fs::read_to_string(store_dir.path().join("a.txt.2024-01-15")).unwrap(),
            "evening"
        );
        assert_eq!(
            fs::read_to_string(store_dir.path().join("a.txt.2024-01-16")).unwrap(),
            "next day"
        );
    }

    #[test]
    fn test_failed_copy_keeps_todays_version() {
        let store_dir = TempDir::new().unwrap();
        let store = RetentionStore::new(store_dir.path());
        fs::write(store_dir.path().join("a.txt.2024-01-15"), "earlier").unwrap();

        let item = WorkItem::file("a.txt", store_dir.path().join("does-not-exist"));
        let err = rotate(&store, &item, day(15), &MemoryReporter::new()).unwrap_err();

        assert!(matches!(err, BackupError::Copy { .. }));
        assert_eq!(
            fs::read_to_string(store_dir.path().join("a.txt.2024-01-15")).unwrap(),
            "earlier"
        );
    }
}
