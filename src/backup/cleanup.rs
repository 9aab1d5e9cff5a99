//! Cleanup pass
//!
//! Removes versions past a plan's retention threshold. Numbered plans keep
//! generations `0..=retain`; dated plans keep versions at most `retain` days
//! old. Only files matching `<base_name>.<generation>` of a tracked item are
//! ever considered.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use super::report::ItemFailure;
use crate::error::BackupError;
use crate::models::{BackupPlan, Generation, RetentionEntry, RetentionKind};
use crate::notify::ProgressReporter;
use crate::storage::RetentionStore;

/// Result of one cleanup pass
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Files that were deleted
    pub evicted: Vec<PathBuf>,
    /// Entries that could not be listed or deleted
    pub failures: Vec<ItemFailure>,
}

/// Whether `entry` is past the retention threshold
pub fn is_expired(
    entry: &RetentionEntry,
    kind: RetentionKind,
    threshold: u32,
    today: NaiveDate,
) -> bool {
    match (kind, &entry.generation) {
        (RetentionKind::ByCount, Generation::Number(n)) => *n > threshold,
        (RetentionKind::ByAge, Generation::Date(_)) => entry
            .age_in_days(today)
            .is_some_and(|age| age > i64::from(threshold)),
        _ => false,
    }
}

/// Delete every expired entry of every tracked item of `plan`
pub fn run(
    store: &RetentionStore,
    plan: &BackupPlan,
    today: NaiveDate,
    reporter: &dyn ProgressReporter,
) -> CleanupReport {
    let mut report = CleanupReport::default();

    reporter.report("Cleaning up old files...", "");

    for base_name in plan.base_names() {
        let entries = match store.entries_for(&base_name, plan.retention_kind) {
            Ok(entries) => entries,
            Err(e) => {
                reporter.report_failure(&format!("Failed to clean up {}", base_name), &e.to_string());
                report.failures.push(ItemFailure::new(base_name, e));
                continue;
            }
        };

        for entry in entries {
            if !is_expired(&entry, plan.retention_kind, plan.retention_threshold, today) {
                continue;
            }

            match fs::remove_file(&entry.path) {
                Ok(()) => {
                    tracing::debug!(path = %entry.path.display(), "evicted");
                    report.evicted.push(entry.path);
                }
                Err(e) => {
                    let error = BackupError::Io(format!(
                        "Could not remove {}: {}",
                        entry.path.display(),
                        e
                    ));
                    reporter.report_failure(
                        &format!("Failed to clean up {}", base_name),
                        &error.to_string(),
                    );
                    report.failures.push(ItemFailure::new(base_name.clone(), error));
                }
            }
        }
    }

    reporter.report("Cleaning up old files...", "Done!");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MemoryReporter;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn files(dir: &TempDir) -> BTreeSet<String> {
        fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect()
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn populate(dir: &TempDir, names: &[&str]) {
        for name in names {
            fs::write(dir.path().join(name), name).unwrap();
        }
    }

    #[test]
    fn test_numbered_threshold_is_inclusive() {
        let dir = TempDir::new().unwrap();
        populate(&dir, &["notes.txt.0", "notes.txt.1", "notes.txt.2", "notes.txt.3", "notes.txt.7"]);
        let plan = BackupPlan::new(RetentionKind::ByCount, 2, dir.path()).with_file("/src/notes.txt");

        let report = run(
            &RetentionStore::new(dir.path()),
            &plan,
            date(2024, 1, 15),
            &MemoryReporter::new(),
        );

        assert_eq!(report.evicted.len(), 2);
        assert!(report.failures.is_empty());
        assert_eq!(
            files(&dir),
            set(&["notes.txt.0", "notes.txt.1", "notes.txt.2"])
        );
    }

    #[test]
    fn test_dated_keeps_threshold_days() {
        let dir = TempDir::new().unwrap();
        populate(
            &dir,
            &["db.2024-01-15", "db.2024-01-12", "db.2024-01-08", "db.2024-01-07", "db.2024-01-20"],
        );
        let plan = BackupPlan::new(RetentionKind::ByAge, 7, dir.path()).with_file("/src/db");

        let report = run(
            &RetentionStore::new(dir.path()),
            &plan,
            date(2024, 1, 15),
            &MemoryReporter::new(),
        );

        assert_eq!(report.evicted, vec![dir.path().join("db.2024-01-07")]);
        assert!(files(&dir).contains("db.2024-01-08"));
        assert!(files(&dir).contains("db.2024-01-20"));
    }

    #[test]
    fn test_unrelated_files_survive() {
        let dir = TempDir::new().unwrap();
        populate(
            &dir,
            &["notes.txt.9", "notes.txt_old.txt", "notes.txt.bak.9", "other.9", "notes.txt.2020-01-01"],
        );
        let plan = BackupPlan::new(RetentionKind::ByCount, 1, dir.path()).with_file("/src/notes.txt");

        run(
            &RetentionStore::new(dir.path()),
            &plan,
            date(2024, 1, 15),
            &MemoryReporter::new(),
        );

        assert_eq!(
            files(&dir),
            set(&[
                "notes.txt_old.txt",
                "notes.txt.bak.9",
                "other.9",
                "notes.txt.2020-01-01",
            ])
        );
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let dir = TempDir::new().unwrap();
        populate(&dir, &["a.0", "a.1", "a.2", "a.3", "b.2024-01-01"]);
        let plan = BackupPlan::new(RetentionKind::ByCount, 1, dir.path())
            .with_file("/src/a")
            .with_directory("/src/b", None);
        let store = RetentionStore::new(dir.path());
        let reporter = MemoryReporter::new();

        run(&store, &plan, date(2024, 1, 15), &reporter);
        let after_first = files(&dir);
        let second = run(&store, &plan, date(2024, 1, 15), &reporter);

        assert!(second.evicted.is_empty());
        assert_eq!(files(&dir), after_first);
    }

    #[test]
    fn test_saved_as_name_is_cleaned() {
        let dir = TempDir::new().unwrap();
        populate(&dir, &["project.0", "project.1", "project.2", "site.2"]);
        let plan = BackupPlan::new(RetentionKind::ByCount, 1, dir.path())
            .with_directory("/src/site", Some("project"));

        run(
            &RetentionStore::new(dir.path()),
            &plan,
            date(2024, 1, 15),
            &MemoryReporter::new(),
        );

        assert!(!dir.path().join("project.2").exists());
        assert!(dir.path().join("site.2").exists());
    }

    #[test]
    fn test_is_expired_ignores_mismatched_kind() {
        let entry = RetentionEntry {
            base_name: "a".into(),
            generation: Generation::Number(50),
            path: PathBuf::from("a.50"),
        };
        assert!(!is_expired(&entry, RetentionKind::ByAge, 1, date(2024, 1, 1)));
        assert!(is_expired(&entry, RetentionKind::ByCount, 49, date(2024, 1, 1)));
        assert!(!is_expired(&entry, RetentionKind::ByCount, 50, date(2024, 1, 1)));
    }
}
