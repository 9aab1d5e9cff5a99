//! autobackup - scheduled local backups with rotating retention
//!
//! This library reads backup plans from an XML document and, for each plan,
//! copies the tracked files and archived directories into a backup location.
//! Copies are kept either as numbered generations (`notes.txt.0` is the
//! newest) or as one dated copy per day (`notes.txt.2024-01-15`), and a
//! cleanup pass removes whatever falls outside the plan's retention rule.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, settings, logging and the XML plan file
//! - `error`: Custom error types
//! - `models`: Backup plans and retention entries
//! - `storage`: The retention store and staged file copies
//! - `backup`: Rotation engines, cleanup pass, archiver and plan runner
//! - `notify`: Progress reporters
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use autobackup::backup::{PlanRunner, RunContext, ZipArchiver};
//! use autobackup::config::load_plans;
//! use autobackup::notify::LogReporter;
//!
//! let plans = load_plans("AutoBackupConfig.xml".as_ref())?;
//! let runner = PlanRunner::new(&ZipArchiver, &LogReporter, RunContext::today());
//! let summary = runner.run_all(&plans);
//! println!("{}", summary.status_line());
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod notify;
pub mod storage;

pub use error::{BackupError, BackupResult};
