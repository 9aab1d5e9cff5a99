//! Backup plan runner
//!
//! Runs plans one after another. For each plan: make sure the retention
//! store exists, archive tracked directories, rotate every item, delete the
//! temporary archives, then run the cleanup pass. Item failures are reported
//! and collected; a plan whose store cannot be created is skipped without
//! affecting the others.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use super::archiver::Archiver;
use super::report::{ItemFailure, PlanReport, RunSummary};
use super::{cleanup, dated, numbered, RunContext, WorkItem};
use crate::error::BackupError;
use crate::models::{base_name, BackupPlan, RetentionKind};
use crate::notify::ProgressReporter;
use crate::storage::RetentionStore;

/// Runs backup plans against the filesystem
pub struct PlanRunner<'a> {
    archiver: &'a dyn Archiver,
    reporter: &'a dyn ProgressReporter,
    context: RunContext,
}

impl<'a> PlanRunner<'a> {
    pub fn new(
        archiver: &'a dyn Archiver,
        reporter: &'a dyn ProgressReporter,
        context: RunContext,
    ) -> Self {
        Self {
            archiver,
            reporter,
            context,
        }
    }

    /// Back up and clean up every plan, in order
    pub fn run_all(&self, plans: &[BackupPlan]) -> RunSummary {
        let mut summary = RunSummary::default();
        for plan in plans {
            summary.push(self.run_plan(plan));
        }
        summary
    }

    /// Run only the cleanup pass for every plan
    pub fn prune_all(&self, plans: &[BackupPlan]) -> RunSummary {
        let mut summary = RunSummary::default();
        for plan in plans {
            let mut report = PlanReport::new(
                plan.destination.clone(),
                plan.retention_kind,
                plan.item_count(),
            );
            let cleaned = cleanup::run(
                &RetentionStore::for_plan(plan),
                plan,
                self.context.today,
                self.reporter,
            );
            report.evicted = cleaned.evicted;
            report.failures = cleaned.failures;
            summary.push(report);
        }
        summary
    }

    /// Back up one plan and clean up its retention store
    pub fn run_plan(&self, plan: &BackupPlan) -> PlanReport {
        let mut report = PlanReport::new(
            plan.destination.clone(),
            plan.retention_kind,
            plan.item_count(),
        );
        let store = RetentionStore::for_plan(plan);

        tracing::info!(
            destination = %plan.destination.display(),
            retention = %plan.retention_kind,
            retain = plan.retention_threshold,
            items = plan.item_count(),
            "running backup plan"
        );

        if let Err(e) = self.prepare_store(&store) {
            self.reporter.report_failure(
                &format!("Failed to prepare {}", plan.destination.display()),
                &e.to_string(),
            );
            report
                .failures
                .push(ItemFailure::new(plan.destination.display().to_string(), e));
            return report;
        }

        let (scratch, archives) = self.archive_directories(plan, &mut report);
        let mut items = self.tracked_files(plan, &mut report);
        items.extend(archives);

        for item in &items {
            let rotated = match plan.retention_kind {
                RetentionKind::ByCount => numbered::rotate(&store, item, self.reporter),
                RetentionKind::ByAge => {
                    dated::rotate(&store, item, self.context.today, self.reporter)
                }
            };

            match rotated {
                Ok(entry) => report.rotated.push(entry),
                Err(e) => {
                    self.reporter.report_failure(
                        &format!("Failed to backup {}", item.base_name),
                        &e.to_string(),
                    );
                    report.failures.push(ItemFailure::new(item.base_name.clone(), e));
                }
            }
        }

        self.remove_archives(&items);
        drop(scratch);

        let cleaned = cleanup::run(&store, plan, self.context.today, self.reporter);
        report.evicted = cleaned.evicted;
        report.failures.extend(cleaned.failures);

        tracing::info!("{}", report.summary());
        report
    }

    fn prepare_store(&self, store: &RetentionStore) -> Result<(), BackupError> {
        if store.ensure_exists()? {
            tracing::info!(path = %store.root().display(), "created backup location");
            if !self.context.settle_delay.is_zero() {
                std::thread::sleep(self.context.settle_delay);
            }
        }
        Ok(())
    }

    /// Archive every tracked directory into a scratch directory
    ///
    /// The scratch directory is returned so it outlives rotation.
    fn archive_directories(
        &self,
        plan: &BackupPlan,
        report: &mut PlanReport,
    ) -> (Option<TempDir>, Vec<WorkItem>) {
        if plan.tracked_directories.is_empty() {
            return (None, Vec::new());
        }

        let scratch = match tempfile::Builder::new().prefix("autobackup-").tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                for dir in &plan.tracked_directories {
                    let error = BackupError::archive(
                        &dir.source,
                        format!("no scratch space for archive: {}", e),
                    );
                    self.report_item_failure(&dir.save_as, error, report);
                }
                return (None, Vec::new());
            }
        };

        let mut items = Vec::new();
        for dir in &plan.tracked_directories {
            self.reporter
                .report("Archiving directories...", &format!("Saving {}", dir.save_as));

            match self.archiver.archive(&dir.source, scratch.path(), &dir.save_as) {
                Ok(archive) => items.push(WorkItem::archive(dir.save_as.clone(), archive)),
                Err(e) => self.report_item_failure(&dir.save_as, e, report),
            }
        }

        (Some(scratch), items)
    }

    fn tracked_files(&self, plan: &BackupPlan, report: &mut PlanReport) -> Vec<WorkItem> {
        let mut items = Vec::new();
        for path in &plan.tracked_files {
            match base_name(path) {
                Some(name) => items.push(WorkItem::file(name, path.clone())),
                None => {
                    let error = BackupError::copy(path.display().to_string(), "not a file path");
                    self.report_item_failure(&path.display().to_string(), error, report);
                }
            }
        }
        items
    }

    fn remove_archives(&self, items: &[WorkItem]) {
        for item in items.iter().filter(|item| item.temporary) {
            self.reporter.report("Cleaning up...", "");
            remove_archive(&item.source);
        }
    }

    fn report_item_failure(&self, item: &str, error: BackupError, report: &mut PlanReport) {
        self.reporter
            .report_failure(&format!("Failed to backup {}", item), &error.to_string());
        report.failures.push(ItemFailure::new(item, error));
    }
}

fn remove_archive(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "could not remove temporary archive");
    }
}
