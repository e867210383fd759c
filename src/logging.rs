//! Tracing setup.
//!
//! The terminal belongs to the UI, so log lines go to a file through a
//! non-blocking writer. `RUST_LOG` takes precedence over the configured level.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log file name inside the log directory.
pub const LOG_FILE_NAME: &str = "taskmaster.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid log filter '{filter}': {source}")]
    Filter {
        filter: String,
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("cannot create log directory {}: {source}", .dir.display())]
    Directory { dir: PathBuf, source: std::io::Error },
    #[error("logging already initialised: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Default log directory: `<tmp>/taskmaster`.
pub fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("taskmaster")
}

/// Build the filter from `RUST_LOG` when set, otherwise from `level`.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => Ok(EnvFilter::from_default_env()),
        _ => EnvFilter::try_new(level).map_err(|source| LoggingError::Filter {
            filter: level.to_string(),
            source,
        }),
    }
}

/// Install the global subscriber writing to `<dir>/taskmaster.log`.
pub fn init_tracing(dir: &Path, level: &str) -> Result<PathBuf, LoggingError> {
    let filter = build_filter(level)?;

    std::fs::create_dir_all(dir).map_err(|source| LoggingError::Directory {
        dir: dir.to_path_buf(),
        source,
    })?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()?;

    Ok(dir.join(LOG_FILE_NAME))
}
