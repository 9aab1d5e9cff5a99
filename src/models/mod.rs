//! Core data models for autobackup
//!
//! This module contains the data structures the backup engine works on:
//! configured backup plans and the versions they leave in a retention store.

pub mod entry;
pub mod plan;

pub use entry::{Generation, RetentionEntry, DATE_SUFFIX_FORMAT};
pub use plan::{base_name, BackupPlan, RetentionKind, TrackedDirectory};
