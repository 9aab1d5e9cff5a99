//! Plan display formatting
//!
//! Formats backup plans for `autobackup check`.

use crate::models::{BackupPlan, RetentionKind};

/// Human description of a plan's retention rule
pub fn describe_retention(plan: &BackupPlan) -> String {
    match plan.retention_kind {
        RetentionKind::ByCount => format!(
            "keep generations 0-{} ({} versions)",
            plan.retention_threshold,
            plan.retention_threshold.saturating_add(1)
        ),
        RetentionKind::ByAge => format!("keep {} days", plan.retention_threshold),
    }
}

/// Format one plan's details
pub fn format_plan_details(index: usize, plan: &BackupPlan) -> String {
    let mut output = String::new();

    output.push_str(&format!("Plan {}: {}\n", index + 1, plan.destination.display()));
    output.push_str(&format!("  Retention: {}\n", describe_retention(plan)));

    if plan.tracked_files.is_empty() && plan.tracked_directories.is_empty() {
        output.push_str("  (nothing tracked)\n");
        return output;
    }

    for file in &plan.tracked_files {
        output.push_str(&format!("  file       {}\n", file.display()));
    }

    for dir in &plan.tracked_directories {
        output.push_str(&format!(
            "  directory  {} (saved as {})\n",
            dir.source.display(),
            dir.save_as
        ));
    }

    output
}

/// Format every plan
pub fn format_plan_list(plans: &[BackupPlan]) -> String {
    if plans.is_empty() {
        return "No backup plans configured.".to_string();
    }

    plans
        .iter()
        .enumerate()
        .map(|(i, plan)| format_plan_details(i, plan))
        .collect::<Vec<_>>()
        .join("\n")
}
