//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the backup engine.

pub mod backup;
pub mod plan;

use std::path::PathBuf;

use chrono::NaiveDate;

pub use backup::{handle_prune, handle_run};
pub use plan::{handle_check, handle_config, handle_init, handle_status};

/// Per-invocation options resolved from flags and settings
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Plan document to read
    pub plan_file: PathBuf,
    /// Date the run is performed on
    pub today: NaiveDate,
    /// Whether desktop notifications may be shown
    pub notify: bool,
}
