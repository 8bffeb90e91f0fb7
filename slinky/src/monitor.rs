//! # Stream Monitor
//!
//! Consumes one live feed (submissions *or* comments of one subreddit),
//! filters it, and dispatches accepted items to the registered handlers.
//!
//! # Lifecycle
//!
//! ```text
//! Created --connect--> Connected --monitor--> Monitoring --> Stopped
//! ```
//!
//! - **Connect** probes the session once for diagnostics. A failed probe is
//!   logged and does not prevent monitoring.
//! - **Monitoring** handles one item at a time. Items of the wrong kind are
//!   logged and skipped; items caught by the monitor's chain are skipped
//!   silently; accepted items go to every handler in registration order.
//! - **Stopped** is terminal. The loop ends when the run flag is cancelled
//!   or the feed runs dry, and a stopped monitor never resumes.
//!
//! Cancellation is cooperative: the flag is checked between items, so the
//! item being dispatched always finishes.

use crate::{
    config::Settings,
    error::MonitorError,
    feed::{RedditSession, StreamOptions},
};
use futures::StreamExt;
use slinky_core::{FilterChain, FilteredHandler, Handler, Item, ItemKind, Rule};
use slinky_std::HandlerRegistry;
use std::{fmt, sync::Arc};
use tokio_util::sync::CancellationToken;

/// Where a monitor is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Configured, not yet connected.
    Created,
    /// Holding a live session.
    Connected,
    /// Consuming the feed.
    Monitoring,
    /// Finished. Terminal.
    Stopped,
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MonitorState::Created => "created",
            MonitorState::Connected => "connected",
            MonitorState::Monitoring => "monitoring",
            MonitorState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Counters for one monitoring run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorReport {
    /// Items pulled from the feed and inspected.
    pub received: usize,
    /// Items handed to the handlers.
    pub dispatched: usize,
    /// Items of the wrong kind.
    pub mismatched: usize,
    /// Items caught by the monitor's chain.
    pub blocked: usize,
    /// Items skipped because a monitor rule failed.
    pub rule_errors: usize,
    /// Handler failures across all dispatched items.
    pub handler_failures: usize,
}

/// A monitor for one item kind in one subreddit.
pub struct StreamMonitor {
    kind: ItemKind,
    subreddit: String,
    options: StreamOptions,
    probe_channel: String,
    probe_limit: usize,
    filter: FilterChain,
    handlers: HandlerRegistry,
    run: CancellationToken,
    session: Option<Arc<dyn RedditSession>>,
    state: MonitorState,
}

impl StreamMonitor {
    /// Create a monitor for `kind` items of the configured subreddit.
    pub fn new(kind: ItemKind, settings: &Settings) -> Self {
        Self {
            kind,
            subreddit: settings.subreddit.clone(),
            options: settings.stream.clone(),
            probe_channel: settings.probe_channel.clone(),
            probe_limit: settings.probe_limit,
            filter: FilterChain::new(format!("{kind}s in r/{}", settings.subreddit)),
            handlers: HandlerRegistry::new(),
            run: CancellationToken::new(),
            session: None,
            state: MonitorState::Created,
        }
    }

    /// A submission monitor.
    pub fn submissions(settings: &Settings) -> Self {
        Self::new(ItemKind::Submission, settings)
    }

    /// A comment monitor.
    pub fn comments(settings: &Settings) -> Self {
        Self::new(ItemKind::Comment, settings)
    }

    /// The item kind this monitor expects.
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// The current lifecycle state.
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// The monitor's own chain.
    pub fn filter(&self) -> &FilterChain {
        &self.filter
    }

    /// Adds a rule to the monitor's chain. Duplicates are ignored.
    pub fn add_rule(&mut self, rule: Arc<dyn Rule>) -> bool {
        self.filter.add_rule(rule)
    }

    /// Removes a rule from the monitor's chain.
    pub fn remove_rule(&mut self, rule: &Arc<dyn Rule>) -> bool {
        self.filter.remove_rule(rule)
    }

    /// Replaces the monitor's chain. `None` keeps the current one.
    pub fn set_filter(&mut self, filter: impl Into<Option<FilterChain>>) {
        if let Some(filter) = filter.into() {
            self.filter = filter;
        }
    }

    /// Registers a handler with a pass-all chain.
    pub fn add_handler<H: Handler>(&mut self, handler: H) {
        self.handlers.register(handler);
    }

    /// Registers a handler that carries its own chain.
    pub fn add_filtered_handler(&mut self, handler: FilteredHandler) {
        self.handlers.register_filtered(handler);
    }

    /// The registered handlers.
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// The run flag. Cancel it to stop the monitor at the next item.
    pub fn stop_handle(&self) -> CancellationToken {
        self.run.clone()
    }

    /// Stops the monitor at the next item.
    pub fn stop(&self) {
        self.run.cancel();
    }

    /// Attaches a live session and probes it once.
    pub async fn connect(&mut self, session: Arc<dyn RedditSession>) -> Result<(), MonitorError> {
        if self.state == MonitorState::Stopped {
            return Err(MonitorError::Stopped);
        }

        match session.probe(&self.probe_channel, self.probe_limit).await {
            Ok(items) => {
                for item in items {
                    let title = item
                        .as_submission()
                        .map(|s| s.title.as_str())
                        .unwrap_or_else(|| item.text());
                    tracing::debug!("Connection tested with {}: {title}", item.id());
                }
            }
            Err(err) => tracing::error!(error = %err, "Failed to connect."),
        }

        self.session = Some(session);
        self.state = MonitorState::Connected;
        Ok(())
    }

    /// Consumes the feed until the run flag is cancelled or the feed ends.
    pub async fn monitor(&mut self) -> Result<MonitorReport, MonitorError> {
        let session = match (self.state, &self.session) {
            (MonitorState::Stopped, _) => return Err(MonitorError::Stopped),
            (MonitorState::Connected, Some(session)) => session.clone(),
            _ => return Err(MonitorError::NotConnected),
        };

        self.state = MonitorState::Monitoring;
        tracing::debug!("Monitoring {}s in {}", self.kind, self.subreddit);

        let mut stream = session.stream(&self.subreddit, self.kind, &self.options);
        let mut report = MonitorReport::default();

        loop {
            let next = tokio::select! {
                biased;
                _ = self.run.cancelled() => None,
                item = stream.next() => item,
            };
            let Some(item) = next else {
                break;
            };
            if self.run.is_cancelled() {
                break;
            }
            report.received += 1;

            if !self.accepts(&item, &mut report) {
                continue;
            }

            tracing::info!("Handling {}: {}", item.kind(), item.id());
            let dispatch = self.handlers.dispatch(&item).await;
            report.dispatched += 1;
            report.handler_failures += dispatch.failed;
        }

        if self.run.is_cancelled() {
            tracing::info!("Breaking monitoring...");
        }
        self.state = MonitorState::Stopped;
        tracing::info!(?report, "monitoring stopped");
        Ok(report)
    }

    fn accepts(&self, item: &Item, report: &mut MonitorReport) -> bool {
        if item.kind() != self.kind {
            tracing::warn!("Expected {} but got {}", self.kind, item.kind());
            report.mismatched += 1;
            return false;
        }

        match self.filter.test(item) {
            Ok(false) => true,
            Ok(true) => {
                report.blocked += 1;
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, "monitor filter failed, skipping item");
                report.rule_errors += 1;
                false
            }
        }
    }
}

impl fmt::Debug for StreamMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamMonitor")
            .field("kind", &self.kind)
            .field("subreddit", &self.subreddit)
            .field("state", &self.state)
            .field("filter", &self.filter)
            .field("handlers", &self.handlers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSession;
    use slinky_core::{Comment, Submission};
    use slinky_std::testing::{CountingHandler, ErrorRule};

    fn submission(id: &str) -> Item {
        Submission {
            id: id.into(),
            ..Default::default()
        }
        .into()
    }

    #[tokio::test]
    async fn monitor_requires_connect() {
        let mut monitor = StreamMonitor::submissions(&Settings::default());
        assert_eq!(monitor.monitor().await.unwrap_err(), MonitorError::NotConnected);
        assert_eq!(monitor.state(), MonitorState::Created);
    }

    #[tokio::test]
    async fn failed_probe_still_connects() {
        let session = MockSession::with_feed(vec![submission("a")]).fail_probe("offline");
        let mut monitor = StreamMonitor::submissions(&Settings::default());

        monitor.connect(Arc::new(session.clone())).await.unwrap();
        assert_eq!(monitor.state(), MonitorState::Connected);
        assert_eq!(session.probes(), 1);
    }

    #[tokio::test]
    async fn stopped_monitor_does_not_resume() {
        let session = Arc::new(MockSession::with_feed(vec![submission("a")]));
        let counter = CountingHandler::new();
        let mut monitor = StreamMonitor::submissions(&Settings::default());
        monitor.add_handler(counter.clone());

        monitor.connect(session.clone()).await.unwrap();
        monitor.monitor().await.unwrap();
        assert_eq!(monitor.state(), MonitorState::Stopped);

        assert_eq!(monitor.monitor().await.unwrap_err(), MonitorError::Stopped);
        assert_eq!(monitor.connect(session).await.unwrap_err(), MonitorError::Stopped);
        assert_eq!(counter.count(), 1);
    }

    #[tokio::test]
    async fn subscribes_with_settings() {
        let settings = Settings {
            subreddit: "rust".into(),
            ..Settings::default()
        };
        let session = MockSession::new();
        let mut monitor = StreamMonitor::comments(&settings);
        monitor.connect(Arc::new(session.clone())).await.unwrap();
        monitor.monitor().await.unwrap();

        let subscriptions = session.subscriptions();
        assert_eq!(subscriptions.len(), 1);
        assert_eq!(subscriptions[0].channel, "rust");
        assert_eq!(subscriptions[0].kind, ItemKind::Comment);
        assert_eq!(subscriptions[0].options, settings.stream);
    }

    #[tokio::test]
    async fn broken_monitor_rule_skips_items() {
        let session = MockSession::with_feed(vec![submission("a"), submission("b")]);
        let counter = CountingHandler::new();
        let mut monitor = StreamMonitor::submissions(&Settings::default());
        monitor.add_rule(Arc::new(ErrorRule));
        monitor.add_handler(counter.clone());

        monitor.connect(Arc::new(session)).await.unwrap();
        let report = monitor.monitor().await.unwrap();

        assert_eq!(report.rule_errors, 2);
        assert_eq!(report.dispatched, 0);
        assert_eq!(counter.count(), 0);
    }

    #[tokio::test]
    async fn cancelled_before_start_dispatches_nothing() {
        let comment: Item = Comment::default().into();
        let session = MockSession::with_feed(vec![comment.clone(), comment]);
        let counter = CountingHandler::new();
        let mut monitor = StreamMonitor::comments(&Settings::default());
        monitor.add_handler(counter.clone());
        monitor.stop();

        monitor.connect(Arc::new(session)).await.unwrap();
        let report = monitor.monitor().await.unwrap();

        assert_eq!(report.received, 0);
        assert_eq!(counter.count(), 0);
        assert_eq!(monitor.state(), MonitorState::Stopped);
    }
}
