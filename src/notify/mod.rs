//! Progress reporting
//!
//! The backup engine tells a [`ProgressReporter`] what it is doing at each
//! step. Reporters are informational only: they never fail and never change
//! the outcome of a run.
//!
//! - [`DesktopReporter`]: desktop notifications via notify-rust
//! - [`LogReporter`]: tracing events only
//! - [`MemoryReporter`]: records events, used by tests

mod desktop;

use std::cell::RefCell;

pub use desktop::DesktopReporter;

/// Sink for progress and failure messages
pub trait ProgressReporter {
    /// A run titled `title` is starting
    fn begin(&self, title: &str) {
        self.report(title, "");
    }

    /// Informational progress update
    fn report(&self, status: &str, detail: &str);

    /// One item failed; the run continues
    fn report_failure(&self, title: &str, message: &str);

    /// The run finished
    fn complete(&self, title: &str, status: &str) {
        self.report(title, status);
    }
}

/// Reporter that only writes tracing events
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn report(&self, status: &str, detail: &str) {
        if detail.is_empty() {
            tracing::info!("{}", status);
        } else {
            tracing::info!("{} {}", status, detail);
        }
    }

    fn report_failure(&self, title: &str, message: &str) {
        tracing::warn!("{}: {}", title, message);
    }
}

/// A recorded reporter call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Begin { title: String },
    Status { status: String, detail: String },
    Failure { title: String, message: String },
    Complete { title: String, status: String },
}

/// Reporter that keeps every event in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: RefCell<Vec<ReportEvent>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in the order they were reported
    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.borrow().clone()
    }

    /// Status lines of all progress updates
    pub fn statuses(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                ReportEvent::Status { status, .. } => Some(status.clone()),
                _ => None,
            })
            .collect()
    }

    /// Titles of all failure reports
    pub fn failures(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                ReportEvent::Failure { title, .. } => Some(title.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ReportEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl ProgressReporter for MemoryReporter {
    fn begin(&self, title: &str) {
        self.push(ReportEvent::Begin {
            title: title.to_string(),
        });
    }

    fn report(&self, status: &str, detail: &str) {
        self.push(ReportEvent::Status {
            status: status.to_string(),
            detail: detail.to_string(),
        });
    }

    fn report_failure(&self, title: &str, message: &str) {
        self.push(ReportEvent::Failure {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn complete(&self, title: &str, status: &str) {
        self.push(ReportEvent::Complete {
            title: title.to_string(),
            status: status.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reporter_records_in_order() {
        let reporter = MemoryReporter::new();
        reporter.begin("Running Backup");
        reporter.report("Backing up files...", "Saving notes.txt");
        reporter.report_failure("Failed to backup a.txt", "disk full");
        reporter.complete("Backup Complete!", "Saved 2 files");

        let events = reporter.events();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            ReportEvent::Begin {
                title: "Running Backup".into()
            }
        );
        assert_eq!(reporter.statuses(), vec!["Backing up files..."]);
        assert_eq!(reporter.failures(), vec!["Failed to backup a.txt"]);
    }

    #[test]
    fn test_log_reporter_never_panics() {
        let reporter = LogReporter;
        reporter.begin("Running Backup");
        reporter.report("Cleaning up...", "");
        reporter.report_failure("Failed", "reason");
        reporter.complete("Done", "");
    }
}
