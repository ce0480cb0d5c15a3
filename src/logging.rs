//! Logging setup
//!
//! The interactive view owns the terminal, so its diagnostics go to a log
//! file (truncated on every run). One-shot commands log to stderr instead.
//! Levels follow `RUST_LOG` when set.

use crate::error::{CatalogError, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Name of the log file written next to the executable
pub const LOG_FILE_NAME: &str = "pdfcatalog.log";

/// Where log lines go
#[derive(Debug, Clone)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Default log file path (same directory as executable)
pub fn default_log_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE_NAME)
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber.
///
/// The returned guard flushes buffered lines when dropped; keep it alive
/// until exit.
pub fn init(target: &LogTarget, default_level: &str) -> Result<WorkerGuard> {
    let (writer, guard, ansi) = match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true) // Start fresh each run
                .open(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            (writer, guard, false)
        }
        LogTarget::Stderr => {
            let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
            (writer, guard, true)
        }
    };

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .with_thread_names(true)
        .with_env_filter(filter(default_level))
        .try_init()
        .map_err(|e| CatalogError::Logging(e.to_string()))?;

    Ok(guard)
}
