//! Error types for the Slinky application layer.
//!
//! - [`Error`] - Top-level error type
//! - [`ConfigError`] - Credentials or settings could not be loaded
//! - [`MonitorError`] - A monitor was driven out of order
//! - [`RedditError`] - Reddit refused or failed a request

use std::path::PathBuf;
use thiserror::Error;

pub use crate::{reddit::RedditError, stackoverflow::ApiError};
pub use slinky_core::{BoxError, HandlerError, RuleError};

/// Top-level error type for all Slinky operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A monitor was used in the wrong state.
    #[error("monitor error: {0}")]
    Monitor(#[from] MonitorError),

    /// Reddit failed.
    #[error("reddit error: {0}")]
    Reddit(#[from] RedditError),

    /// The question API failed.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Logging could not be initialised.
    #[error("logging error: {0}")]
    Logging(String),
}

/// Errors loading credentials or settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {path}")]
    Io {
        /// The file that was read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not the expected JSON.
    #[error("malformed {path}")]
    Parse {
        /// The file that was parsed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from driving a [`StreamMonitor`](crate::StreamMonitor).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MonitorError {
    /// `monitor` was called before `connect`.
    #[error("monitor is not connected")]
    NotConnected,

    /// `monitor` was called on a monitor that already finished.
    #[error("monitor has been stopped")]
    Stopped,
}

/// Convenience alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
