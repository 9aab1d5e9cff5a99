//! Plan inspection commands
//!
//! Implements `check`, `status`, `config` and `init`.

use std::fs;
use std::path::PathBuf;

use crate::config::load_plans;
use crate::config::paths::BackupPaths;
use crate::config::settings::Settings;
use crate::display::{format_plan_list, format_store_listing};
use crate::display::plan::describe_retention;
use crate::error::{BackupError, BackupResult};
use crate::storage::RetentionStore;

use super::RunOptions;

/// Parse and validate the plan file, then print every plan
pub fn handle_check(options: &RunOptions) -> BackupResult<()> {
    let plans = load_plans(&options.plan_file)?;

    println!("Plan file: {}", options.plan_file.display());
    println!();
    println!("{}", format_plan_list(&plans));
    println!();
    println!("{} plan(s) OK", plans.len());

    Ok(())
}

/// Print the versions currently stored for every plan
pub fn handle_status(options: &RunOptions) -> BackupResult<()> {
    let plans = load_plans(&options.plan_file)?;

    if plans.is_empty() {
        println!("No backup plans configured.");
        return Ok(());
    }

    for (i, plan) in plans.iter().enumerate() {
        let store = RetentionStore::for_plan(plan);

        println!(
            "Plan {}: {} [{}]",
            i + 1,
            plan.destination.display(),
            describe_retention(plan)
        );

        if !store.root().exists() {
            println!("  (no backups yet)");
        } else {
            print!("{}", format_store_listing(&store.list_tracked(plan)?));
        }
        println!();
    }

    Ok(())
}

/// Plan file written by `init` when none exists yet
const SAMPLE_PLAN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<backups>
    <!-- Keep generations 0-5 of each item: notes.txt.0 is the newest. -->
    <backup retain="5" retain_type="number">
        <file>/path/to/notes.txt</file>
        <directory save_as="project">/path/to/project</directory>
        <location>/path/to/backups/numbered</location>
    </backup>
    <!-- Keep one copy per day for 14 days: notes.txt.YYYY-MM-DD. -->
    <backup retain="14" retain_type="days">
        <file>/path/to/notes.txt</file>
        <location>/path/to/backups/daily</location>
    </backup>
</backups>
"#;

/// Write the settings file and, if missing, a sample plan file
///
/// Returns the plan file path and whether it was created.
pub fn handle_init(
    paths: &BackupPaths,
    settings: &Settings,
    options: &RunOptions,
) -> BackupResult<(PathBuf, bool)> {
    settings.save(paths)?;
    println!("Settings written to {}", paths.settings_file().display());

    let plan_file = options.plan_file.clone();
    if plan_file.exists() {
        println!("Plan file already exists: {}", plan_file.display());
        return Ok((plan_file, false));
    }

    if let Some(parent) = plan_file.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            BackupError::Io(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }
    fs::write(&plan_file, SAMPLE_PLAN).map_err(|e| {
        BackupError::Io(format!("Failed to write {}: {}", plan_file.display(), e))
    })?;

    println!("Sample plan file written to {}", plan_file.display());
    println!("Edit it, then run 'autobackup check'.");
    Ok((plan_file, true))
}

/// Print resolved paths and settings
pub fn handle_config(paths: &BackupPaths, settings: &Settings, options: &RunOptions) {
    println!("autobackup Configuration");
    println!("========================");
    println!("Base directory: {}", paths.base_dir().display());
    println!("Settings file:  {}", paths.settings_file().display());
    println!("Plan file:      {}", options.plan_file.display());
    println!("Log directory:  {}", paths.log_dir().display());
    println!();
    println!("Settings:");
    println!(
        "  Notifications: {}",
        if settings.notifications.enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("  Step delay:    {} ms", settings.step_delay_ms);
    println!("  Settle delay:  {} ms", settings.settle_delay_ms);
    println!("  Log level:     {}", settings.log_level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_plans;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn options(plan_file: PathBuf) -> RunOptions {
        RunOptions {
            plan_file,
            today: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            notify: false,
        }
    }

    #[test]
    fn test_sample_plan_parses() {
        let plans = parse_plans(SAMPLE_PLAN).unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].item_count(), 2);
    }

    #[test]
    fn test_init_writes_settings_and_plan() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackupPaths::with_base_dir(temp_dir.path().join("home"));
        let mut settings = Settings::default();
        settings.step_delay_ms = 7;

        let (plan_file, created) =
            handle_init(&paths, &settings, &options(paths.plan_file())).unwrap();

        assert!(created);
        assert_eq!(fs::read_to_string(&plan_file).unwrap(), SAMPLE_PLAN);
        let saved = Settings::load_or_create(&paths).unwrap();
        assert_eq!(saved.step_delay_ms, 7);
        assert_eq!(saved.schema_version, 1);
    }

    #[test]
    fn test_init_keeps_existing_plan() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackupPaths::with_base_dir(temp_dir.path().to_path_buf());
        fs::write(paths.plan_file(), "<backups/>").unwrap();

        let (_, created) =
            handle_init(&paths, &Settings::default(), &options(paths.plan_file())).unwrap();

        assert!(!created);
        assert_eq!(fs::read_to_string(paths.plan_file()).unwrap(), "<backups/>");
    }
}
