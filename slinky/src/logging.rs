//! Logging setup.
//!
//! Three sinks share one subscriber:
//!
//! - `slinky.debug.log` in the log directory, everything from DEBUG up
//! - `slinky.info.log` in the log directory, INFO and up
//! - the console, INFO and up unless `RUST_LOG` says otherwise
//!
//! File writes go through non-blocking appenders; keep the returned
//! [`LogGuards`] alive until shutdown so buffered lines are flushed.

use crate::error::{Error, Result};
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name of the debug log.
pub const DEBUG_LOG_FILE: &str = "slinky.debug.log";

/// File name of the info log.
pub const INFO_LOG_FILE: &str = "slinky.info.log";

/// Filter of the debug log. HTTP internals stay at INFO.
pub const DEBUG_FILE_FILTER: &str = "debug,hyper=info,hyper_util=info,h2=info,rustls=info";

/// Console filter when `RUST_LOG` is unset.
pub const DEFAULT_CONSOLE_FILTER: &str = "info";

/// Flush guards for the file sinks.
#[must_use = "dropping the guards stops the file writers"]
#[derive(Debug)]
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

fn file_writer(dir: &Path, name: &str) -> (NonBlocking, WorkerGuard) {
    let appender = tracing_appender::rolling::never(dir, name);
    tracing_appender::non_blocking(appender)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::Logging(format!("cannot create {}: {e}", dir.display())))
}

/// Installs the global subscriber writing to `log_dir` and the console.
pub fn init_logging(log_dir: &Path) -> Result<LogGuards> {
    ensure_dir(log_dir)?;

    let (debug_writer, debug_guard) = file_writer(log_dir, DEBUG_LOG_FILE);
    let (info_writer, info_guard) = file_writer(log_dir, INFO_LOG_FILE);

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_FILTER));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(debug_writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new(DEBUG_FILE_FILTER)),
        )
        .with(
            fmt::layer()
                .with_writer(info_writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new("info")),
        )
        .with(fmt::layer().with_target(false).with_filter(console_filter))
        .try_init()
        .map_err(|e| Error::Logging(format!("failed to set global subscriber: {e}")))?;

    tracing::debug!(dir = %log_dir.display(), "logging initialised");
    Ok(LogGuards {
        _guards: vec![debug_guard, info_guard],
    })
}
