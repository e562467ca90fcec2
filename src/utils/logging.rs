//! Logging system initialization
//!
//! Sets up tracing-based logging with file output to `<log_dir>/hudconfig.log`
//! and rotation on every start, keeping the last 10 sessions.

use crate::error::{HudConfigError, Result, StringError};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Maximum number of historical log files to keep (hudconfig.log.1 through .9)
const MAX_LOG_FILES: u8 = 9;

const LOG_PREFIX: &str = "hudconfig";
const LOG_SUFFIX: &str = "log";

/// Initialize the logging system
///
/// Log level defaults to INFO (DEBUG when `verbose`) and can be overridden
/// with the `RUST_LOG` environment variable.
pub fn init_logging(log_dir: &Path, verbose: bool) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let log_path = log_dir.join(format!("{LOG_PREFIX}.{LOG_SUFFIX}"));
    rotate_logs_on_startup(&log_path)?;

    // Rotation is handled manually on startup
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix(LOG_SUFFIX)
        .build(log_dir)
        .map_err(|e| HudConfigError::LoggingError(Box::new(e)))?;

    let default_level = if verbose { "debug" } else { "info" };
    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| HudConfigError::LoggingError(Box::new(e)))?;

    tracing::info!("hudconfig v{} started", env!("CARGO_PKG_VERSION"));

    Ok(())
}

/// Shift `name.N` to `name.N+1`, dropping the oldest, then move the current
/// log to `name.1`. A fresh log is created by the appender.
fn rotate_logs_on_startup(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let log_dir = log_path
        .parent()
        .ok_or_else(|| HudConfigError::LoggingError(StringError::new("Invalid log path")))?;
    let log_name = log_path
        .file_name()
        .ok_or_else(|| HudConfigError::LoggingError(StringError::new("Invalid log filename")))?
        .to_string_lossy();

    let oldest_log = log_dir.join(format!("{log_name}.{MAX_LOG_FILES}"));
    if oldest_log.exists() {
        std::fs::remove_file(&oldest_log)?;
    }

    for i in (1..MAX_LOG_FILES).rev() {
        let current_log = log_dir.join(format!("{log_name}.{i}"));
        if current_log.exists() {
            std::fs::rename(&current_log, log_dir.join(format!("{log_name}.{}", i + 1)))?;
        }
    }

    std::fs::rename(log_path, log_dir.join(format!("{log_name}.1")))?;

    Ok(())
}
