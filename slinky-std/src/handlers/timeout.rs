//! Timeout wrapper for time-limited handler actions.

use slinky_core::{BoxError, Handler, HandlerError, Item};
use std::time::Duration;
use tokio::time::timeout;

/// A handler that wraps another handler with a time limit.
///
/// A slow reply must not hold the stream forever: when the limit is hit the
/// inner action is dropped and a [`HandlerError::Timeout`] is returned.
pub struct TimeoutHandler<H> {
    inner: H,
    duration: Duration,
}

impl<H> TimeoutHandler<H> {
    /// Create a new timeout handler.
    pub fn new(inner: H, duration: Duration) -> Self {
        Self { inner, duration }
    }
}

impl<H: Handler> Handler for TimeoutHandler<H> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn act(&self, item: &Item) -> Result<(), BoxError> {
        match timeout(self.duration, self.inner.act(item)).await {
            Ok(result) => result,
            Err(_) => Err(Box::new(HandlerError::Timeout {
                handler: self.inner.name().to_string(),
                after: self.duration,
            })),
        }
    }
}
