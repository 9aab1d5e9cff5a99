//! Run results
//!
//! Every item produces either a rotated entry or a failure; both are
//! collected here instead of aborting the plan.

use std::path::PathBuf;

use crate::error::BackupError;
use crate::models::{RetentionEntry, RetentionKind};

/// A tracked item that could not be backed up or cleaned up
#[derive(Debug)]
pub struct ItemFailure {
    /// Base name (or path) of the item
    pub item: String,
    /// What went wrong
    pub error: BackupError,
}

impl ItemFailure {
    pub fn new(item: impl Into<String>, error: BackupError) -> Self {
        Self {
            item: item.into(),
            error,
        }
    }
}

/// Outcome of one backup plan
#[derive(Debug)]
pub struct PlanReport {
    /// Retention store of the plan
    pub destination: PathBuf,
    /// Retention style of the plan
    pub retention_kind: RetentionKind,
    /// Tracked files plus tracked directories
    pub items: usize,
    /// Newly written entries
    pub rotated: Vec<RetentionEntry>,
    /// Entries removed by the cleanup pass
    pub evicted: Vec<PathBuf>,
    /// Per-item failures, in the order they happened
    pub failures: Vec<ItemFailure>,
}

impl PlanReport {
    pub fn new(destination: PathBuf, retention_kind: RetentionKind, items: usize) -> Self {
        Self {
            destination,
            retention_kind,
            items,
            rotated: Vec::new(),
            evicted: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// True when every step of every item succeeded
    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{}: {} saved, {} removed",
            self.destination.display(),
            self.rotated.len(),
            self.evicted.len()
        );
        if !self.failures.is_empty() {
            summary.push_str(&format!(", {} failed", self.failures.len()));
        }
        summary
    }
}

/// Outcome of a whole run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// One report per plan, in plan order
    pub plans: Vec<PlanReport>,
    /// Tracked files plus tracked directories across all plans
    pub total_items: usize,
}

impl RunSummary {
    /// Add a plan's report to the totals
    pub fn push(&mut self, report: PlanReport) {
        self.total_items += report.items;
        self.plans.push(report);
    }

    /// Number of failures across all plans
    pub fn failure_count(&self) -> usize {
        self.plans.iter().map(|plan| plan.failures.len()).sum()
    }

    /// All failures across all plans
    pub fn failures(&self) -> impl Iterator<Item = &ItemFailure> {
        self.plans.iter().flat_map(|plan| plan.failures.iter())
    }

    /// Status line shown when the run completes
    pub fn status_line(&self) -> String {
        format!("Saved {} files", self.total_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_summary() {
        let mut report = PlanReport::new(PathBuf::from("/b"), RetentionKind::ByCount, 3);
        assert!(report.succeeded());
        assert_eq!(report.summary(), "/b: 0 saved, 0 removed");

        report.evicted.push(PathBuf::from("/b/a.4"));
        report
            .failures
            .push(ItemFailure::new("a", BackupError::copy("a", "denied")));
        assert!(!report.succeeded());
        assert_eq!(report.summary(), "/b: 0 saved, 1 removed, 1 failed");
    }

    #[test]
    fn test_run_summary_totals() {
        let mut summary = RunSummary::default();
        summary.push(PlanReport::new(PathBuf::from("/a"), RetentionKind::ByCount, 2));

        let mut failed = PlanReport::new(PathBuf::from("/b"), RetentionKind::ByAge, 3);
        failed
            .failures
            .push(ItemFailure::new("x", BackupError::copy("x", "gone")));
        summary.push(failed);

        assert_eq!(summary.total_items, 5);
        assert_eq!(summary.failure_count(), 1);
        assert_eq!(summary.failures().count(), 1);
        assert_eq!(summary.status_line(), "Saved 5 files");
    }
}
