//! reqwest-backed Reddit session.
//!
//! Authenticates as a script application with the password grant, then
//! talks to the OAuth API with a bearer token that is refreshed shortly
//! before it expires. Live streams are listing polls with a window of
//! already-seen ids.

use crate::{
    config::Credentials,
    feed::{RedditSession, ReplyTarget, StreamOptions},
};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::{Client, header::USER_AGENT};
use serde::Deserialize;
use slinky_core::{BoxError, Comment, Item, ItemKind, Submission};
use std::{
    collections::{HashSet, VecDeque},
    sync::Arc,
    time::Duration,
};
use thiserror::Error;
use tokio::{sync::Mutex, time::Instant};

/// Token endpoint for the password grant.
pub const AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Root of the OAuth API.
pub const API_ROOT: &str = "https://oauth.reddit.com";

/// Items requested per listing poll.
const LISTING_LIMIT: usize = 100;

/// Ids remembered per stream.
const SEEN_WINDOW: usize = 301;

/// Tokens are refreshed this long before they expire.
const TOKEN_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed for a token whose expiry does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Errors talking to Reddit.
#[derive(Error, Debug)]
pub enum RedditError {
    /// The request could not be sent or the body not read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The token endpoint refused the credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The API answered with a non-success status.
    #[error("{path} answered {status}: {message}")]
    Api {
        /// Request path.
        path: String,
        /// HTTP status.
        status: u16,
        /// Response body.
        message: String,
    },

    /// A reply was rejected.
    #[error("reply rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    expires_in: u64,
    error: Option<String>,
}

#[derive(Debug, Clone)]
struct Token {
    value: String,
    expires: Instant,
}

#[derive(Debug, Deserialize)]
struct Thing {
    kind: String,
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct CommentResponse {
    json: CommentJson,
}

#[derive(Debug, Deserialize)]
struct CommentJson {
    #[serde(default)]
    errors: Vec<serde_json::Value>,
    data: Option<CommentData>,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    #[serde(default)]
    things: Vec<Thing>,
}

/// Converts listing children into items. Unknown kinds are dropped;
/// malformed children are logged and dropped.
fn listing_items(listing: Listing) -> Vec<Item> {
    listing
        .data
        .children
        .into_iter()
        .filter_map(|thing| {
            let decoded = match thing.kind.as_str() {
                "t3" => serde_json::from_value::<Submission>(thing.data).map(Item::from),
                "t1" => serde_json::from_value::<Comment>(thing.data).map(Item::from),
                other => {
                    tracing::trace!(kind = other, "skipping listing child");
                    return None;
                }
            };
            decoded
                .inspect_err(|err| {
                    tracing::warn!(kind = %thing.kind, error = %err, "malformed listing child")
                })
                .ok()
        })
        .collect()
}

/// The fullname of the comment a reply created.
fn reply_fullname(response: CommentResponse) -> Result<ReplyTarget, RedditError> {
    if !response.json.errors.is_empty() {
        return Err(RedditError::Rejected(
            serde_json::Value::Array(response.json.errors).to_string(),
        ));
    }
    response
        .json
        .data
        .and_then(|data| data.things.into_iter().next())
        .and_then(|thing| {
            thing
                .data
                .get("name")
                .and_then(|name| name.as_str())
                .map(ReplyTarget::new)
        })
        .ok_or_else(|| RedditError::Rejected("response carried no comment".into()))
}

/// When a token issued now with `expires_in` seconds of life expires.
fn token_expiry(expires_in: u64) -> Instant {
    let now = Instant::now();
    now.checked_add(Duration::from_secs(expires_in))
        .unwrap_or(now + FAR_FUTURE)
}

/// Listing path for a stream of `kind` in `channel`.
fn stream_path(channel: &str, kind: ItemKind) -> String {
    match kind {
        ItemKind::Submission => format!("/r/{channel}/new"),
        ItemKind::Comment => format!("/r/{channel}/comments"),
    }
}

/// A bounded set of ids. The oldest id is forgotten first.
#[derive(Debug)]
struct SeenWindow {
    order: VecDeque<String>,
    ids: HashSet<String>,
    capacity: usize,
}

impl SeenWindow {
    fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            ids: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns `true` if `id` was not seen yet.
    fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
        self.order.push_back(id.to_string());
        self.ids.insert(id.to_string());
        true
    }
}

/// Turns listing batches into a sequence of unseen items.
#[derive(Debug)]
struct Poller {
    seen: SeenWindow,
    primed: bool,
    exclude_before: Option<f64>,
    empty_polls: u32,
}

impl Poller {
    fn new(options: &StreamOptions) -> Self {
        Self {
            seen: SeenWindow::new(SEEN_WINDOW),
            primed: !options.skip_existing,
            exclude_before: options.exclude_before,
            empty_polls: 0,
        }
    }

    /// Accepts one newest-first batch and returns its unseen items, oldest
    /// first. The first batch only primes the window when existing items
    /// are skipped.
    fn accept(&mut self, batch: Vec<Item>) -> Vec<Item> {
        let fresh: Vec<Item> = batch
            .into_iter()
            .rev()
            .filter(|item| self.seen.insert(item.id()))
            .filter(|item| {
                self.exclude_before
                    .is_none_or(|cutoff| item.created_utc() >= cutoff)
            })
            .collect();

        if !self.primed {
            self.primed = true;
            tracing::debug!(skipped = fresh.len(), "skipping existing items");
            return Vec::new();
        }

        if fresh.is_empty() {
            self.empty_polls += 1;
        } else {
            self.empty_polls = 0;
        }
        fresh
    }

    fn exhausted(&self, pause_after: Option<u32>) -> bool {
        pause_after.is_some_and(|limit| self.empty_polls > limit)
    }
}

struct PollState {
    client: RedditClient,
    path: String,
    pause_after: Option<u32>,
    poller: Poller,
    pending: VecDeque<Item>,
    polled: bool,
}

struct Inner {
    http: Client,
    credentials: Credentials,
    auth_url: String,
    api_root: String,
    poll_interval: Duration,
    token: Mutex<Option<Token>>,
}

/// An authenticated Reddit session. Clones share the token.
#[derive(Clone)]
pub struct RedditClient {
    inner: Arc<Inner>,
}

impl RedditClient {
    /// Create a session polling every `poll_interval`. No request is made
    /// until the first call.
    pub fn new(http: Client, credentials: Credentials, poll_interval: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                http,
                credentials,
                auth_url: AUTH_URL.to_string(),
                api_root: API_ROOT.to_string(),
                poll_interval,
                token: Mutex::new(None),
            }),
        }
    }

    /// Create a session and fetch its first token.
    pub async fn login(
        http: Client,
        credentials: Credentials,
        poll_interval: Duration,
    ) -> Result<Self, RedditError> {
        let client = Self::new(http, credentials, poll_interval);
        client.token().await?;
        tracing::info!(user = %client.username(), "logged in to reddit");
        Ok(client)
    }

    /// The account the session posts as.
    pub fn username(&self) -> &str {
        &self.inner.credentials.reddit.username
    }

    fn user_agent(&self) -> &str {
        &self.inner.credentials.app.user_agent
    }

    async fn token(&self) -> Result<String, RedditError> {
        let mut token = self.inner.token.lock().await;
        if let Some(current) = token.as_ref() {
            if Instant::now() + TOKEN_MARGIN < current.expires {
                return Ok(current.value.clone());
            }
        }

        let credentials = &self.inner.credentials;
        tracing::debug!(url = %self.inner.auth_url, "requesting access token");
        let response: TokenResponse = self
            .inner
            .http
            .post(&self.inner.auth_url)
            .header(USER_AGENT, self.user_agent())
            .basic_auth(&credentials.app.client_id, Some(&credentials.app.client_secret))
            .form(&[
                ("grant_type", "password"),
                ("username", credentials.reddit.username.as_str()),
                ("password", credentials.reddit.password.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;

        let value = match (response.access_token, response.error) {
            (Some(value), None) => value,
            (_, Some(error)) => return Err(RedditError::Auth(error)),
            (None, None) => return Err(RedditError::Auth("no access token".into())),
        };
        let fresh = Token {
            value: value.clone(),
            expires: token_expiry(response.expires_in),
        };
        *token = Some(fresh);
        Ok(value)
    }

    async fn checked(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, RedditError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(RedditError::Api {
            path: path.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    /// Fetches one listing page, newest first.
    pub async fn listing(&self, path: &str, limit: usize) -> Result<Vec<Item>, RedditError> {
        let url = format!("{}{path}", self.inner.api_root);
        tracing::trace!(%url, limit, "GET");
        let token = self.token().await?;
        let limit = limit.to_string();
        let response = self
            .inner
            .http
            .get(&url)
            .header(USER_AGENT, self.user_agent())
            .bearer_auth(token)
            .query(&[("limit", limit.as_str()), ("raw_json", "1")])
            .send()
            .await?;
        let listing: Listing = self.checked(path, response).await?.json().await?;
        Ok(listing_items(listing))
    }

    async fn comment(&self, target: &ReplyTarget, body: &str) -> Result<ReplyTarget, RedditError> {
        let path = "/api/comment";
        let url = format!("{}{path}", self.inner.api_root);
        tracing::debug!(parent = %target, len = body.len(), "POST {path}");
        let token = self.token().await?;
        let response = self
            .inner
            .http
            .post(&url)
            .header(USER_AGENT, self.user_agent())
            .bearer_auth(token)
            .form(&[
                ("api_type", "json"),
                ("thing_id", target.fullname()),
                ("text", body),
            ])
            .send()
            .await?;
        let decoded: CommentResponse = self.checked(path, response).await?.json().await?;
        reply_fullname(decoded)
    }

    async fn next_polled(mut state: PollState) -> Option<(Item, PollState)> {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.poller.exhausted(state.pause_after) {
                tracing::info!(path = %state.path, "stream paused after empty polls");
                return None;
            }
            if state.polled {
                tokio::time::sleep(state.client.inner.poll_interval).await;
            }
            state.polled = true;

            match state.client.listing(&state.path, LISTING_LIMIT).await {
                Ok(batch) => state.pending.extend(state.poller.accept(batch)),
                Err(err) => tracing::warn!(path = %state.path, error = %err, "poll failed"),
            }
        }
    }
}

#[async_trait]
impl RedditSession for RedditClient {
    async fn probe(&self, channel: &str, limit: usize) -> Result<Vec<Item>, BoxError> {
        Ok(self.listing(&stream_path(channel, ItemKind::Submission), limit).await?)
    }

    fn stream(
        &self,
        channel: &str,
        kind: ItemKind,
        options: &StreamOptions,
    ) -> BoxStream<'static, Item> {
        let state = PollState {
            client: self.clone(),
            path: stream_path(channel, kind),
            pause_after: options.pause_after,
            poller: Poller::new(options),
            pending: VecDeque::new(),
            polled: false,
        };
        stream::unfold(state, Self::next_polled).boxed()
    }

    async fn reply(&self, target: &ReplyTarget, body: &str) -> Result<ReplyTarget, BoxError> {
        Ok(self.comment(target, body).await?)
    }
}

impl std::fmt::Debug for RedditClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditClient")
            .field("user", &self.username())
            .field("api_root", &self.inner.api_root)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(id: &str, created: f64) -> Item {
        Submission {
            id: id.into(),
            created_utc: created,
            ..Default::default()
        }
        .into()
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(Item::id).collect()
    }

    #[test]
    fn listing_children_become_items() {
        let json = r#"{
            "kind": "Listing",
            "data": {
                "after": null,
                "children": [
                    {"kind": "t3", "data": {"id": "s1", "author": "a", "title": "T", "selftext": "body",
                        "link_flair_text": null, "permalink": "/r/x/s1", "url": "https://x", "created_utc": 1.0,
                        "score": 3}},
                    {"kind": "t1", "data": {"id": "c1", "author": "b", "body": "hi", "link_id": "t3_s1",
                        "parent_id": "t3_s1", "permalink": "/r/x/s1/c1", "created_utc": 2.0}},
                    {"kind": "more", "data": {"count": 4}}
                ]
            }
        }"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        let items = listing_items(listing);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_submission().unwrap().title, "T");
        assert_eq!(items[1].as_comment().unwrap().parent_id, "t3_s1");
    }

    #[test]
    fn malformed_children_are_dropped() {
        let json = r#"{"data": {"children": [
            {"kind": "t3", "data": {"id": "bad", "title": 5}},
            {"kind": "t1", "data": {"id": "good", "body": "ok"}}
        ]}}"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        let items = listing_items(listing);

        assert_eq!(ids(&items), ["good"]);
    }

    #[test]
    fn reply_returns_new_fullname() {
        let json = r#"{"json": {"errors": [], "data": {"things": [{"kind": "t1", "data": {"name": "t1_new", "id": "new"}}]}}}"#;
        let response: CommentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(reply_fullname(response).unwrap().fullname(), "t1_new");
    }

    #[test]
    fn reply_errors_are_rejections() {
        let json = r#"{"json": {"errors": [["RATELIMIT", "try again in 5 minutes", "ratelimit"]]}}"#;
        let response: CommentResponse = serde_json::from_str(json).unwrap();
        let err = reply_fullname(response).unwrap_err();
        assert!(matches!(err, RedditError::Rejected(message) if message.contains("RATELIMIT")));
    }

    #[test]
    fn token_expiry_saturates() {
        let soon = token_expiry(3600);
        assert!(soon > Instant::now() + Duration::from_secs(3500));
        assert!(token_expiry(u64::MAX) > soon);
    }

    #[test]
    fn stream_paths() {
        assert_eq!(stream_path("VBAMod", ItemKind::Submission), "/r/VBAMod/new");
        assert_eq!(stream_path("VBAMod", ItemKind::Comment), "/r/VBAMod/comments");
    }

    #[test]
    fn seen_window_forgets_oldest() {
        let mut seen = SeenWindow::new(2);
        assert!(seen.insert("a"));
        assert!(!seen.insert("a"));
        assert!(seen.insert("b"));
        assert!(seen.insert("c"));
        assert!(seen.insert("a"));
        assert!(!seen.insert("c"));
    }

    #[test]
    fn first_batch_primes_when_skipping_existing() {
        let mut poller = Poller::new(&StreamOptions::default());

        assert!(poller.accept(vec![submission("b", 2.0), submission("a", 1.0)]).is_empty());

        let fresh = poller.accept(vec![
            submission("d", 4.0),
            submission("c", 3.0),
            submission("b", 2.0),
        ]);
        assert_eq!(ids(&fresh), ["c", "d"]);
    }

    #[test]
    fn existing_items_are_yielded_oldest_first() {
        let options = StreamOptions {
            skip_existing: false,
            ..Default::default()
        };
        let mut poller = Poller::new(&options);
        let fresh = poller.accept(vec![submission("b", 2.0), submission("a", 1.0)]);
        assert_eq!(ids(&fresh), ["a", "b"]);
    }

    #[test]
    fn old_items_are_excluded() {
        let options = StreamOptions {
            skip_existing: false,
            exclude_before: Some(10.0),
            ..Default::default()
        };
        let mut poller = Poller::new(&options);
        let fresh = poller.accept(vec![submission("new", 11.0), submission("old", 9.0)]);
        assert_eq!(ids(&fresh), ["new"]);
    }

    #[test]
    fn empty_polls_exhaust_the_stream() {
        let options = StreamOptions {
            skip_existing: false,
            pause_after: Some(1),
            ..Default::default()
        };
        let mut poller = Poller::new(&options);
        poller.accept(vec![submission("a", 1.0)]);
        poller.accept(vec![submission("a", 1.0)]);
        assert!(!poller.exhausted(options.pause_after));
        poller.accept(vec![]);
        assert!(poller.exhausted(options.pause_after));
        assert!(!poller.exhausted(None));
    }
}
