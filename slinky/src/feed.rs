//! # Live Feed
//!
//! The boundary to Reddit. A [`RedditSession`] is an authenticated
//! connection that can be probed, subscribed to and replied through.
//!
//! The monitor only ever sees the stream as an unbounded, non-restartable
//! sequence of [`Item`]s; how items are fetched (polling, push, a scripted
//! test feed) is the session's business.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use slinky_core::{BoxError, Item, ItemKind};
use std::fmt;

/// How a live stream should behave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamOptions {
    /// Skip the items that already exist when the stream starts.
    pub skip_existing: bool,
    /// Give up after this many consecutive empty polls. `None` polls forever.
    pub pause_after: Option<u32>,
    /// Ignore items created before this unix timestamp.
    pub exclude_before: Option<f64>,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            skip_existing: true,
            pause_after: None,
            exclude_before: None,
        }
    }
}

/// Something a reply can be attached to: a submission or comment fullname.
///
/// Posting a reply returns the reply's own target, so threads can be built
/// by replying to what was just posted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReplyTarget(String);

impl ReplyTarget {
    /// Wraps a fullname such as `t3_abc123`.
    pub fn new(fullname: impl Into<String>) -> Self {
        Self(fullname.into())
    }

    /// The fullname.
    pub fn fullname(&self) -> &str {
        &self.0
    }
}

impl From<&Item> for ReplyTarget {
    fn from(item: &Item) -> Self {
        Self(item.fullname())
    }
}

impl fmt::Display for ReplyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An authenticated connection to Reddit.
#[async_trait]
pub trait RedditSession: Send + Sync + 'static {
    /// Fetches up to `limit` of the newest submissions in `channel`.
    ///
    /// Used once at connect time as a liveness check.
    async fn probe(&self, channel: &str, limit: usize) -> Result<Vec<Item>, BoxError>;

    /// Subscribes to new items of `kind` in `channel`.
    fn stream(
        &self,
        channel: &str,
        kind: ItemKind,
        options: &StreamOptions,
    ) -> BoxStream<'static, Item>;

    /// Posts `body` (markdown) as a reply to `target`.
    async fn reply(&self, target: &ReplyTarget, body: &str) -> Result<ReplyTarget, BoxError>;
}
