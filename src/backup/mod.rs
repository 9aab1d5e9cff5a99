//! Backup engine for autobackup
//!
//! Copies tracked items into a plan's retention store and keeps a bounded
//! history of older versions.
//!
//! # Architecture
//!
//! - `archiver`: packs tracked directories into single files
//! - `numbered`: shift-and-insert rotation (`name.0`, `name.1`, ...)
//! - `dated`: one version per day (`name.YYYY-MM-DD`)
//! - `cleanup`: evicts versions past the retention threshold
//! - `runner`: drives the steps above for every plan and reports progress
//!
//! # Retention
//!
//! `retain="N"` keeps generations `0..=N` for numbered plans and versions at
//! most `N` days old for dated plans.
//!
//! # Example
//!
//! ```rust,ignore
//! use autobackup::backup::{PlanRunner, RunContext, ZipArchiver};
//! use autobackup::notify::LogReporter;
//!
//! let runner = PlanRunner::new(&ZipArchiver, &LogReporter, RunContext::today());
//! let summary = runner.run_all(&plans);
//! println!("{}", summary.status_line());
//! ```

mod archiver;
pub mod cleanup;
pub mod dated;
pub mod numbered;
mod report;
mod runner;

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};

pub use archiver::{Archiver, ZipArchiver};
pub use cleanup::CleanupReport;
pub use report::{ItemFailure, PlanReport, RunSummary};
pub use runner::PlanRunner;

/// One file to rotate into a retention store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Name the versions are stored under
    pub base_name: String,
    /// File to copy
    pub source: PathBuf,
    /// Whether `source` is a temporary archive to delete after the plan
    pub temporary: bool,
}

impl WorkItem {
    /// A tracked file
    pub fn file(base_name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            base_name: base_name.into(),
            source: source.into(),
            temporary: false,
        }
    }

    /// An archive made from a tracked directory
    pub fn archive(base_name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            base_name: base_name.into(),
            source: source.into(),
            temporary: true,
        }
    }
}

/// Values a run depends on that would otherwise come from the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    /// Date used for dated versions and age calculations
    pub today: NaiveDate,
    /// Pause after creating a new retention store
    pub settle_delay: Duration,
}

impl RunContext {
    /// Context for `today` with no settle delay
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            settle_delay: Duration::ZERO,
        }
    }

    /// Context for the current local date
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }
}
