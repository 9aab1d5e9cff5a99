//! Backup CLI commands
//!
//! Implements `run` and `prune`.

use crate::backup::{PlanRunner, RunContext, RunSummary, ZipArchiver};
use crate::config::load_plans;
use crate::config::settings::Settings;
use crate::display::format_run_summary;
use crate::error::BackupResult;
use crate::models::BackupPlan;
use crate::notify::{DesktopReporter, LogReporter, ProgressReporter};

use super::RunOptions;

/// Run every plan in the plan file
///
/// Item failures are reported and summarized but do not make the command
/// fail; an unreadable plan file does.
pub fn handle_run(settings: &Settings, options: &RunOptions) -> BackupResult<RunSummary> {
    let reporter = make_reporter(settings, options);
    reporter.begin("Running Backup");

    let plans = load_or_report(options, reporter.as_ref())?;
    let summary = runner(settings, options, reporter.as_ref()).run_all(&plans);

    reporter.complete("Backup Complete!", &summary.status_line());
    print!("{}", format_run_summary(&summary));

    Ok(summary)
}

/// Run only the cleanup pass for every plan in the plan file
pub fn handle_prune(settings: &Settings, options: &RunOptions) -> BackupResult<RunSummary> {
    let reporter = make_reporter(settings, options);
    reporter.begin("Cleaning Up Backups");

    let plans = load_or_report(options, reporter.as_ref())?;
    let summary = runner(settings, options, reporter.as_ref()).prune_all(&plans);

    let removed: usize = summary.plans.iter().map(|plan| plan.evicted.len()).sum();
    reporter.complete("Cleanup Complete!", &format!("Removed {} old files", removed));
    print!("{}", format_run_summary(&summary));

    Ok(summary)
}

fn make_reporter(settings: &Settings, options: &RunOptions) -> Box<dyn ProgressReporter> {
    if options.notify && settings.notifications.enabled {
        Box::new(DesktopReporter::new(
            settings.notifications.app_name.clone(),
            settings.step_delay(),
        ))
    } else {
        Box::new(LogReporter)
    }
}

fn load_or_report(
    options: &RunOptions,
    reporter: &dyn ProgressReporter,
) -> BackupResult<Vec<BackupPlan>> {
    load_plans(&options.plan_file).map_err(|e| {
        reporter.report_failure("Backup failed", &e.to_string());
        e
    })
}

fn runner<'a>(
    settings: &Settings,
    options: &RunOptions,
    reporter: &'a dyn ProgressReporter,
) -> PlanRunner<'a> {
    let context = RunContext::new(options.today).with_settle_delay(settings.settle_delay());
    PlanRunner::new(&ZipArchiver, reporter, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn quiet_settings() -> Settings {
        let mut settings = Settings::default();
        settings.notifications.enabled = false;
        settings.step_delay_ms = 0;
        settings.settle_delay_ms = 0;
        settings
    }

    #[test]
    fn test_handle_run_end_to_end() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("notes.txt");
        fs::write(&source, "hello").unwrap();
        let dest = temp.path().join("backups");
        let plan_file = temp.path().join("plans.xml");
        fs::write(
            &plan_file,
            format!(
                r#"<backups><backup retain="2" retain_type="number"><file>{}</file><location>{}</location></backup></backups>"#,
                source.display(),
                dest.display()
            ),
        )
        .unwrap();

        let options = RunOptions {
            plan_file,
            today: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            notify: false,
        };
        let summary = handle_run(&quiet_settings(), &options).unwrap();

        assert_eq!(summary.total_items, 1);
        assert_eq!(fs::read_to_string(dest.join("notes.txt.0")).unwrap(), "hello");
    }

    #[test]
    fn test_handle_run_missing_plan_file() {
        let temp = TempDir::new().unwrap();
        let options = RunOptions {
            plan_file: temp.path().join("absent.xml"),
            today: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            notify: false,
        };

        let err = handle_run(&quiet_settings(), &options).unwrap_err();
        assert!(err.is_fatal());
    }
}
