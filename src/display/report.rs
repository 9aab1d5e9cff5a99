//! Run summary formatting

use crate::backup::RunSummary;

/// Format the result of a run or prune for the terminal
pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut output = String::new();

    for plan in &summary.plans {
        output.push_str(&format!("{}\n", plan.summary()));
        for failure in &plan.failures {
            output.push_str(&format!("  ! {}: {}\n", failure.item, failure.error));
        }
    }

    output.push_str(&format!(
        "{} plan(s), {}",
        summary.plans.len(),
        summary.status_line()
    ));
    if summary.failure_count() > 0 {
        output.push_str(&format!(", {} failure(s)", summary.failure_count()));
    }
    output.push('\n');

    output
}
