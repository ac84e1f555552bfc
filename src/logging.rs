//! Log setup.
//!
//! The terminal belongs to the UI, so log records go to a file. `RUST_LOG`
//! takes precedence over the configured level.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Default log file: `<cache dir>/treequill/treequill.log`.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|mut path| {
        path.push("treequill");
        path.push("treequill.log");
        path
    })
}

/// Initializes the global logger, appending to `path`.
///
/// `level` is an `env_logger` filter string (e.g. `"info"` or
/// `"treequill=debug"`) applied when `RUST_LOG` is unset.
pub fn init(path: &Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(Some(env_logger::TimestampPrecision::Millis))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("Logger already initialized")?;

    Ok(())
}
