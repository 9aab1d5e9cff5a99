//! Logging setup
//!
//! Scheduled runs usually have no console attached, so every event is written
//! to a daily log file as well as to stderr.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{BackupError, BackupResult};

/// Initialize tracing with a console layer and a rolling file layer
///
/// `RUST_LOG` takes precedence over `level`. The returned guard flushes the
/// file writer on drop and must be kept alive until the run ends.
pub fn init_logging(log_dir: &Path, level: &str) -> BackupResult<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| BackupError::Io(format!("Failed to create log directory: {}", e)))?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "autobackup.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(normalize_level(level)));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| BackupError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(guard)
}

/// Map a configured level to one EnvFilter accepts, defaulting to info
fn normalize_level(level: &str) -> &'static str {
    match level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("DEBUG"), "debug");
        assert_eq!(normalize_level("warning"), "warn");
        assert_eq!(normalize_level("chatty"), "info");
    }
}
