//! Testing utilities for monitors and reply handlers.
//!
//! - [`MockSession`]: a scripted [`RedditSession`] with a finite feed that
//!   records every reply posted through it.
//!
//! Handler and rule doubles from [`slinky_std::testing`] are re-exported.

use crate::feed::{RedditSession, ReplyTarget, StreamOptions};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use slinky_core::{BoxError, Item, ItemKind};
use std::sync::{Arc, Mutex};

pub use slinky_std::testing::{
    CountingHandler, CountingRule, ErrorRule, FailingHandler, RecordingHandler,
};

/// A reply recorded by [`MockSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedReply {
    /// What was replied to.
    pub parent: ReplyTarget,
    /// The markdown body.
    pub body: String,
    /// The fullname handed back for the new reply.
    pub id: ReplyTarget,
}

/// A subscription recorded by [`MockSession`].
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    /// The subscribed channel.
    pub channel: String,
    /// The requested item kind.
    pub kind: ItemKind,
    /// The requested stream options.
    pub options: StreamOptions,
}

#[derive(Default)]
struct Inner {
    feed: Vec<Item>,
    probe_error: Option<String>,
    reply_error: Option<String>,
    probes: usize,
    subscriptions: Vec<Subscription>,
    replies: Vec<PostedReply>,
}

/// A scripted session. Clones share state.
///
/// # Example
///
/// ```rust,ignore
/// let session = MockSession::with_feed(vec![submission("a"), submission("b")]);
/// monitor.connect(Arc::new(session.clone())).await;
/// monitor.monitor().await?;
/// assert_eq!(session.replies().len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct MockSession {
    inner: Arc<Mutex<Inner>>,
}

impl MockSession {
    /// A session with an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose stream yields `items` and then ends.
    pub fn with_feed(items: Vec<Item>) -> Self {
        let session = Self::new();
        session.lock().feed = items;
        session
    }

    /// Makes every probe fail with `message`.
    pub fn fail_probe(self, message: impl Into<String>) -> Self {
        self.lock().probe_error = Some(message.into());
        self
    }

    /// Makes every reply fail with `message`.
    pub fn fail_replies(self, message: impl Into<String>) -> Self {
        self.lock().reply_error = Some(message.into());
        self
    }

    /// How many probes were run.
    pub fn probes(&self) -> usize {
        self.lock().probes
    }

    /// Every subscription made so far.
    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.lock().subscriptions.clone()
    }

    /// Every reply posted so far, in order.
    pub fn replies(&self) -> Vec<PostedReply> {
        self.lock().replies.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl RedditSession for MockSession {
    async fn probe(&self, _channel: &str, limit: usize) -> Result<Vec<Item>, BoxError> {
        let mut inner = self.lock();
        inner.probes += 1;
        if let Some(message) = &inner.probe_error {
            return Err(message.clone().into());
        }
        Ok(inner.feed.iter().take(limit).cloned().collect())
    }

    fn stream(
        &self,
        channel: &str,
        kind: ItemKind,
        options: &StreamOptions,
    ) -> BoxStream<'static, Item> {
        let mut inner = self.lock();
        inner.subscriptions.push(Subscription {
            channel: channel.to_string(),
            kind,
            options: options.clone(),
        });
        stream::iter(inner.feed.clone()).boxed()
    }

    async fn reply(&self, target: &ReplyTarget, body: &str) -> Result<ReplyTarget, BoxError> {
        let mut inner = self.lock();
        if let Some(message) = &inner.reply_error {
            return Err(message.clone().into());
        }
        let id = ReplyTarget::new(format!("t1_reply{}", inner.replies.len() + 1));
        inner.replies.push(PostedReply {
            parent: target.clone(),
            body: body.to_string(),
            id: id.clone(),
        });
        Ok(id)
    }
}
