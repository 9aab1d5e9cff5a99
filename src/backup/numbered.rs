//! Numbered rotation
//!
//! Keeps versions as `<base_name>.0`, `<base_name>.1`, ... with 0 the newest.
//! A rotation stages the new version, shifts every existing generation up by
//! one (highest first), then promotes the staged copy to generation 0. If the
//! copy fails nothing has moved yet; if a shift fails the chain has a gap but
//! no version has been overwritten.

use std::fs;

use super::WorkItem;
use crate::error::{BackupError, BackupResult};
use crate::models::{Generation, RetentionEntry, RetentionKind};
use crate::notify::ProgressReporter;
use crate::storage::{discard, promote, stage_copy, RetentionStore};

/// Store a new generation 0 of `item`, aging all existing generations by one
pub fn rotate(
    store: &RetentionStore,
    item: &WorkItem,
    reporter: &dyn ProgressReporter,
) -> BackupResult<RetentionEntry> {
    let base_name = item.base_name.as_str();
    let staging = store.staging_path(base_name);

    reporter.report("Backing up files...", &format!("Saving {}", base_name));
    stage_copy(&item.source, &staging).map_err(|e| BackupError::copy(base_name, e))?;

    if let Err(e) = shift_generations(store, base_name, reporter) {
        discard(&staging);
        return Err(e);
    }

    let generation = Generation::Number(0);
    let target = store.entry_path(base_name, &generation);
    promote(&staging, &target).map_err(|e| BackupError::copy(base_name, e))?;

    tracing::debug!(item = base_name, path = %target.display(), "stored generation 0");

    Ok(RetentionEntry {
        base_name: base_name.to_string(),
        generation,
        path: target,
    })
}

/// Rename every generation G of `base_name` to G+1, highest first
///
/// Returns the `(from, to)` pairs in the order they were applied.
pub fn shift_generations(
    store: &RetentionStore,
    base_name: &str,
    reporter: &dyn ProgressReporter,
) -> BackupResult<Vec<(u32, u32)>> {
    let mut generations: Vec<u32> = store
        .entries_for(base_name, RetentionKind::ByCount)
        .map_err(|e| BackupError::copy(base_name, e))?
        .iter()
        .filter_map(|entry| entry.generation.as_number())
        .collect();
    generations.sort_unstable_by(|a, b| b.cmp(a));

    if generations.is_empty() {
        return Ok(Vec::new());
    }

    reporter.report("Backing up files...", "Renumbering files");

    let mut shifted = Vec::with_capacity(generations.len());

    for generation in generations {
        let next = generation.checked_add(1).ok_or_else(|| {
            BackupError::copy(base_name, format!("generation {} cannot be aged", generation))
        })?;

        let from = store.entry_path(base_name, &Generation::Number(generation));
        let to = store.entry_path(base_name, &Generation::Number(next));

        fs::rename(&from, &to).map_err(|e| {
            BackupError::copy(
                base_name,
                format!("Could not rename {} to {}: {}", from.display(), to.display(), e),
            )
        })?;

        tracing::debug!(item = base_name, from = generation, to = next, "renumbered");
        shifted.push((generation, next));
    }

    Ok(shifted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MemoryReporter;
    use std::path::Path;
    use tempfile::TempDir;

    fn setup() -> (RetentionStore, TempDir, TempDir) {
        let store_dir = TempDir::new().unwrap();
        let source_dir = TempDir::new().unwrap();
        (RetentionStore::new(store_dir.path()), store_dir, source_dir)
    }

    fn item(source_dir: &Path, name: &str, contents: &str) -> WorkItem {
        let source = source_dir.join(name);
        fs::write(&source, contents).unwrap();
        WorkItem::file(name, source)
    }

    fn read(store: &RetentionStore, name: &str) -> String {
        fs::read_to_string(store.root().join(name)).unwrap()
    }

    #[test]
    fn test_first_rotation_creates_generation_zero() {
        let (store, _s, src) = setup();
        let reporter = MemoryReporter::new();

        let entry = rotate(&store, &item(src.path(), "notes.txt", "v1"), &reporter).unwrap();

        assert_eq!(entry.generation, Generation::Number(0));
        assert_eq!(read(&store, "notes.txt.0"), "v1");
        assert!(!store.staging_path("notes.txt").exists());
    }

    #[test]
    fn test_rotation_shifts_every_generation() {
        let (store, _s, src) = setup();
        let reporter = MemoryReporter::new();

        for version in ["v1", "v2", "v3", "v4"] {
            rotate(&store, &item(src.path(), "notes.txt", version), &reporter).unwrap();
        }

        assert_eq!(read(&store, "notes.txt.0"), "v4");
        assert_eq!(read(&store, "notes.txt.1"), "v3");
        assert_eq!(read(&store, "notes.txt.2"), "v2");
        assert_eq!(read(&store, "notes.txt.3"), "v1");
        assert_eq!(
            store
                .entries_for("notes.txt", RetentionKind::ByCount)
                .unwrap()
                .len(),
            4
        );
    }

    #[test]
    fn test_shift_runs_highest_first() {
        let (store, _s, _src) = setup();
        for g in 0..3 {
            fs::write(store.root().join(format!("a.{}", g)), g.to_string()).unwrap();
        }

        let shifted = shift_generations(&store, "a", &MemoryReporter::new()).unwrap();
        assert_eq!(shifted, vec![(2, 3), (1, 2), (0, 1)]);
        assert!(!store.root().join("a.0").exists());
        assert_eq!(read(&store, "a.3"), "2");
        assert_eq!(read(&store, "a.1"), "0");
    }

    #[test]
    fn test_shift_keeps_gaps() {
        let (store, _s, _src) = setup();
        fs::write(store.root().join("a.0"), "zero").unwrap();
        fs::write(store.root().join("a.4"), "four").unwrap();

        shift_generations(&store, "a", &MemoryReporter::new()).unwrap();
        assert_eq!(read(&store, "a.1"), "zero");
        assert_eq!(read(&store, "a.5"), "four");
    }

    #[test]
    fn test_failed_copy_leaves_generations_untouched() {
        let (store, _s, src) = setup();
        fs::write(store.root().join("notes.txt.0"), "old0").unwrap();
        fs::write(store.root().join("notes.txt.1"), "old1").unwrap();

        let missing = WorkItem::file("notes.txt", src.path().join("notes.txt"));
        let reporter = MemoryReporter::new();
        let err = rotate(&store, &missing, &reporter).unwrap_err();

        assert!(err.is_item_failure());
        assert_eq!(read(&store, "notes.txt.0"), "old0");
        assert_eq!(read(&store, "notes.txt.1"), "old1");
        assert!(!store.root().join("notes.txt.2").exists());
        assert!(!store.staging_path("notes.txt").exists());
    }

    #[test]
    fn test_unrelated_files_never_renamed() {
        let (store, _s, src) = setup();
        for name in ["notes.txt_old.txt", "notes.txt.bak", "notes.txt.1.txt", "notes.0"] {
            fs::write(store.root().join(name), name).unwrap();
        }

        rotate(&store, &item(src.path(), "notes.txt", "v1"), &MemoryReporter::new()).unwrap();
        rotate(&store, &item(src.path(), "notes.txt", "v2"), &MemoryReporter::new()).unwrap();

        for name in ["notes.txt_old.txt", "notes.txt.bak", "notes.txt.1.txt", "notes.0"] {
            assert_eq!(read(&store, name), name);
        }
        assert_eq!(read(&store, "notes.txt.1"), "v1");
    }

    #[test]
    fn test_non_canonical_generation_does_not_block_rotation() {
        let (store, _s, src) = setup();
        fs::write(store.root().join("notes.txt.0"), "old0").unwrap();
        fs::write(store.root().join("notes.txt.01"), "stray").unwrap();
        let reporter = MemoryReporter::new();

        rotate(&store, &item(src.path(), "notes.txt", "v1"), &reporter).unwrap();
        rotate(&store, &item(src.path(), "notes.txt", "v2"), &reporter).unwrap();

        assert_eq!(read(&store, "notes.txt.0"), "v2");
        assert_eq!(read(&store, "notes.txt.1"), "v1");
        assert_eq!(read(&store, "notes.txt.2"), "old0");
        assert_eq!(read(&store, "notes.txt.01"), "stray");
    }

    #[test]
    fn test_unageable_generation_does_not_block_rotation() {
        let (store, _s, src) = setup();
        fs::write(store.root().join("notes.txt.4294967295"), "huge").unwrap();

        rotate(&store, &item(src.path(), "notes.txt", "v1"), &MemoryReporter::new()).unwrap();

        assert_eq!(read(&store, "notes.txt.0"), "v1");
        assert_eq!(read(&store, "notes.txt.4294967295"), "huge");
    }

    #[test]
    fn test_reports_progress() {
        let (store, _s, src) = setup();
        let reporter = MemoryReporter::new();

        rotate(&store, &item(src.path(), "a.txt", "1"), &reporter).unwrap();
        rotate(&store, &item(src.path(), "a.txt", "2"), &reporter).unwrap();

        let events = reporter.events();
        assert!(events.contains(&crate::notify::ReportEvent::Status {
            status: "Backing up files...".into(),
            detail: "Saving a.txt".into(),
        }));
        assert!(events.contains(&crate::notify::ReportEvent::Status {
            status: "Backing up files...".into(),
            detail: "Renumbering files".into(),
        }));
    }
}
