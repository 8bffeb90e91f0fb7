//! Logging handler for item observation.

use slinky_core::{BoxError, Handler, Item};
use tracing::Level;

/// A handler that logs every item it is given.
#[derive(Debug, Clone)]
pub struct LoggingHandler {
    level: Level,
}

impl LoggingHandler {
    /// Logs at `DEBUG`.
    pub fn new() -> Self {
        Self {
            level: Level::DEBUG,
        }
    }

    /// Logs at the given level.
    pub fn with_level(level: Level) -> Self {
        Self { level }
    }

    /// The level items are logged at.
    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for LoggingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for LoggingHandler {
    fn name(&self) -> &str {
        "logging"
    }

    async fn act(&self, item: &Item) -> Result<(), BoxError> {
        let id = item.id();
        let kind = item.kind();
        match self.level {
            Level::TRACE => tracing::trace!(id, %kind, "handled item"),
            Level::DEBUG => tracing::debug!(id, %kind, "handled item"),
            Level::INFO => tracing::info!(id, %kind, "handled item"),
            Level::WARN => tracing::warn!(id, %kind, "handled item"),
            _ => tracing::error!(id, %kind, "handled item"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slinky_core::{FilteredHandler, Handled, Submission};

    #[tokio::test]
    async fn always_acts() {
        let handler = FilteredHandler::new(LoggingHandler::with_level(Level::INFO));
        let item: Item = Submission {
            id: "abc".into(),
            ..Default::default()
        }
        .into();
        assert_eq!(handler.handle(&item).await.unwrap(), Handled::Acted);
        assert_eq!(handler.name(), "logging");
    }
}
