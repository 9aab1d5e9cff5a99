use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use autobackup::cli::{
    handle_check, handle_config, handle_init, handle_prune, handle_run, handle_status,
    RunOptions,
};
use autobackup::config::logging::init_logging;
use autobackup::config::{BackupPaths, Settings};

#[derive(Parser)]
#[command(
    name = "autobackup",
    version,
    about = "Scheduled local backups with rotating retention",
    long_about = "autobackup copies the files and directories named in a backup plan \
                  into a backup location, keeping either a fixed number of numbered \
                  generations or one dated copy per day for a number of days. \
                  It is meant to be invoked by cron or Task Scheduler."
)]
struct Cli {
    /// Plan file to read instead of the configured one
    #[arg(long, global = true, env = "AUTOBACKUP_PLAN_FILE")]
    plan_file: Option<PathBuf>,

    /// Log progress instead of showing desktop notifications
    #[arg(long, global = true)]
    no_notify: bool,

    /// Run as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_date)]
    today: Option<NaiveDate>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every backup plan (default)
    Run,
    /// Validate the plan file and print each plan
    Check,
    /// List the versions currently kept for each plan
    Status,
    /// Remove expired versions without taking new backups
    Prune,
    /// Show configuration paths and settings
    Config,
    /// Write the settings file and a sample plan file
    Init,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = BackupPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let level = if cli.verbose {
        "debug"
    } else {
        settings.log_level.as_str()
    };
    let _guard = init_logging(&paths.log_dir(), level)?;

    let options = RunOptions {
        plan_file: cli
            .plan_file
            .unwrap_or_else(|| settings.resolve_plan_file(&paths)),
        today: cli.today.unwrap_or_else(|| Local::now().date_naive()),
        notify: !cli.no_notify,
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let summary = handle_run(&settings, &options)?;
            tracing::info!(
                items = summary.total_items,
                failures = summary.failure_count(),
                "Backup run finished"
            );
        }
        Commands::Prune => {
            handle_prune(&settings, &options)?;
        }
        Commands::Check => handle_check(&options)?,
        Commands::Status => handle_status(&options)?,
        Commands::Config => handle_config(&paths, &settings, &options),
        Commands::Init => {
            handle_init(&paths, &settings, &options)?;
        }
    }

    Ok(())
}
