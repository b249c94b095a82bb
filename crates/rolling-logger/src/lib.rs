//! Rolling Logger
//!
//! Installs a `tracing` subscriber that writes to stderr and to a daily
//! rolling log file (`<dir>/<app>.<YYYY-MM-DD>.log`).

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("failed to open log files in {path}: {source}")]
    Appender {
        path: PathBuf,
        #[source]
        source: tracing_appender::rolling::InitError,
    },
    #[error("invalid log filter '{0}'")]
    Filter(String),
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Daily appender for `<log_dir>/<app_name>.<date>.log`, keeping `retain` files.
pub fn file_appender(
    log_dir: &Path,
    app_name: &str,
    retain: usize,
) -> Result<RollingFileAppender, LoggerError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(app_name)
        .filename_suffix("log")
        .max_log_files(retain.max(1))
        .build(log_dir)
        .map_err(|source| LoggerError::Appender {
            path: log_dir.to_path_buf(),
            source,
        })
}

/// Filter for `level` unless `RUST_LOG` is set.
fn build_filter(level: &str) -> Result<EnvFilter, LoggerError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).map_err(|_| LoggerError::Filter(level.to_string())),
    }
}

/// Initialize logging to stderr and a rolling file in `log_dir`.
///
/// The returned guard flushes the file writer on drop; keep it alive for
/// the life of the process.
pub fn init_logger(
    log_dir: impl AsRef<Path>,
    app_name: &str,
    level: &str,
    retain: usize,
) -> Result<WorkerGuard, LoggerError> {
    let log_dir = log_dir.as_ref();
    let filter = build_filter(level)?;
    let (writer, guard) = tracing_appender::non_blocking(file_appender(log_dir, app_name, retain)?);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()
        .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(dir = %log_dir.display(), app = app_name, "logger initialized");
    Ok(guard)
}
