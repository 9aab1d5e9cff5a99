//! Storage layer for autobackup
//!
//! Provides the retention store (the directory of stored versions) and the
//! staged copy helpers the rotation engines write through.

pub mod file_io;
pub mod retention_store;

pub use file_io::{discard, promote, stage_copy};
pub use retention_store::RetentionStore;
