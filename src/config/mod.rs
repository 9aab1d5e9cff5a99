//! Configuration module for autobackup
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence
//! - Backup plan file parsing
//! - Logging setup

pub mod logging;
pub mod paths;
pub mod plan_file;
pub mod settings;

pub use paths::BackupPaths;
pub use plan_file::{load_plans, parse_plans};
pub use settings::Settings;
