use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Prefix of the rolling log files, which are named `ecoleta.YYYY-MM-DD.log`
pub const LOG_FILE_PREFIX: &str = "ecoleta";

/// Installs the global tracing subscriber
///
/// `RUST_LOG` wins over the default level (`info`, or `debug` when `debug`
/// is set). Console output is human readable unless `json` is set. With a
/// `log_dir`, events are also written as JSON to a daily rolling file.
///
/// ### Returns
///
/// The guard of the background file writer. It must be held until shutdown,
/// otherwise buffered lines are lost.
pub fn init_tracing(debug: bool, json: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let console = if json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };

    let (file, guard) = match log_dir {
        Some(dir) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(dir)?);
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

/// Builds the daily rolling appender writing into `dir`
pub fn file_appender(dir: &Path) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("Failed to open log directory {:?}", dir))
}
