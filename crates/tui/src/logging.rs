use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::BaseDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "MOVIESUGGEST_LOG";
const LOG_FILE: &str = "moviesuggest.log";

pub fn log_dir() -> PathBuf {
    match BaseDirs::new() {
        Some(base) => base.data_dir().join("moviesuggest"),
        None => std::env::temp_dir().join("moviesuggest"),
    }
}

/// File logging; the terminal itself is owned by the UI. Keep the guard
/// alive until exit so buffered lines are flushed.
pub fn init() -> Result<WorkerGuard> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create log dir: {}", dir.display()))?;
    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {}", e))?;
    Ok(guard)
}
