//! Display formatting for terminal output
//!
//! Formats plans, retention store contents and run results for the CLI.

pub mod plan;
pub mod report;
pub mod store;

pub use plan::{format_plan_details, format_plan_list};
pub use report::format_run_summary;
pub use store::{format_size, format_store_listing};
