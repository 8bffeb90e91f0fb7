//! Error types for Slinky.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`RuleError`] - A filter rule failed to evaluate an item
//! - [`HandlerError`] - A handler failed, was never specialized, or timed out

use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while a [`FilterChain`] evaluates its rules.
///
/// The chain never swallows these; callers decide whether a broken rule
/// should skip the item or abort.
///
/// [`FilterChain`]: crate::FilterChain
#[derive(Error, Debug)]
pub enum RuleError {
    /// A rule returned an error instead of a verdict.
    #[error("rule `{rule}` failed to evaluate item {item}")]
    Evaluation {
        /// Name of the failing rule.
        rule: String,
        /// Id of the item under evaluation.
        item: String,
        /// The underlying error.
        #[source]
        source: BoxError,
    },
}

/// Errors that can occur while a handler processes an item.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The handler never overrode [`Handler::act`]. A programming defect.
    ///
    /// [`Handler::act`]: crate::Handler::act
    #[error("handler `{0}` does not implement an action")]
    NotImplemented(String),

    /// The handler's own filter chain failed.
    #[error("filter error: {0}")]
    Filter(#[from] RuleError),

    /// The handler's action failed.
    #[error("handler `{handler}` failed")]
    Action {
        /// Name of the failing handler.
        handler: String,
        /// The underlying error.
        #[source]
        source: BoxError,
    },

    /// The handler panicked while acting.
    #[error("handler `{handler}` panicked: {message}")]
    Panicked {
        /// Name of the handler that panicked.
        handler: String,
        /// The panic payload, when it was a string.
        message: String,
    },

    /// The handler did not finish in time.
    #[error("handler `{handler}` timed out after {after:?}")]
    Timeout {
        /// Name of the handler that timed out.
        handler: String,
        /// The configured limit.
        after: Duration,
    },
}

impl HandlerError {
    /// Wraps an action failure, unwrapping errors that already are a
    /// [`HandlerError`] so they are not nested twice.
    pub fn action(handler: impl Into<String>, source: BoxError) -> Self {
        match source.downcast::<HandlerError>() {
            Ok(inner) => *inner,
            Err(source) => HandlerError::Action {
                handler: handler.into(),
                source,
            },
        }
    }
}
