//! StackExchange question API.
//!
//! [`StackExchangeClient`] is the raw HTTP collaborator. [`QuestionService`]
//! layers the flow control on top: it waits out any backoff the API asked
//! for, turns non-200 answers into "nothing to post", and builds [`Post`]s.

use super::post::Post;
use async_trait::async_trait;
use serde::Deserialize;
use std::{sync::Mutex, time::Duration};
use thiserror::Error;
use tokio::time::Instant;

/// Base URL of the versioned API.
pub const API_ROOT: &str = "https://api.stackexchange.com/2.2";

/// Deadline used when a requested backoff does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Filter selecting bodies as markdown plus answers and comments.
pub const QUESTION_FILTER: &str = "!)bB87nNAB)iIh5K8KQVmOL4H40p)XRkP)79SqrK4YsMQzAC_olD_O(l890*)eoTI-RG9Fx2-mCmPETbjX1JAtiyo3V-";

/// Errors talking to the question API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request could not be sent or the body not read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The body was not the expected JSON.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Owner block of any post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiOwner {
    /// Public display name.
    pub display_name: Option<String>,
}

/// A comment as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiComment {
    /// Comment id.
    pub comment_id: u64,
    /// Net vote score.
    pub score: i64,
    /// Permanent link.
    pub link: String,
    /// Owner, absent for deleted accounts.
    pub owner: Option<ApiOwner>,
    /// HTML-escaped markdown body.
    pub body_markdown: String,
}

/// An answer as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiAnswer {
    /// Answer id.
    pub answer_id: u64,
    /// Net vote score.
    pub score: i64,
    /// Whether the asker accepted it.
    pub is_accepted: bool,
    /// Permanent link.
    pub link: String,
    /// Owner, absent for deleted accounts.
    pub owner: Option<ApiOwner>,
    /// HTML-escaped markdown body.
    pub body_markdown: String,
    /// Total comments, which may exceed `comments.len()`.
    pub comment_count: u32,
    /// Comments returned with the answer.
    pub comments: Vec<ApiComment>,
}

/// A question as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiQuestion {
    /// Question id.
    pub question_id: u64,
    /// Question title.
    pub title: String,
    /// Net vote score.
    pub score: i64,
    /// Permanent link.
    pub link: String,
    /// Owner, absent for deleted accounts.
    pub owner: Option<ApiOwner>,
    /// HTML-escaped markdown body.
    pub body_markdown: String,
    /// Total comments, which may exceed `comments.len()`.
    pub comment_count: u32,
    /// Comments returned with the question.
    pub comments: Vec<ApiComment>,
    /// Total answers.
    pub answer_count: u32,
    /// Answers returned with the question.
    pub answers: Vec<ApiAnswer>,
}

/// The response wrapper around every API call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuestionResponse {
    /// Matching questions.
    pub items: Vec<ApiQuestion>,
    /// Requests left for today.
    pub quota_remaining: u32,
    /// Daily request quota.
    pub quota_max: u32,
    /// Seconds to wait before calling the same method again.
    pub backoff: Option<u64>,
}

/// What the API answered.
#[derive(Debug, Clone)]
pub enum ApiReply {
    /// A 200 with a decoded body.
    Ok(QuestionResponse),
    /// Any other status.
    Status(u16),
}

/// Fetches questions by id.
#[async_trait]
pub trait QuestionApi: Send + Sync + 'static {
    /// Fetches one question with its answers and comments.
    async fn fetch_question(&self, id: u64) -> Result<ApiReply, ApiError>;
}

/// reqwest-backed [`QuestionApi`].
#[derive(Debug, Clone)]
pub struct StackExchangeClient {
    http: reqwest::Client,
    root: String,
    key: Option<String>,
}

impl StackExchangeClient {
    /// Create a client, optionally with a StackApps key for a larger quota.
    pub fn new(http: reqwest::Client, key: Option<String>) -> Self {
        Self {
            http,
            root: API_ROOT.to_string(),
            key,
        }
    }

    /// Points the client at another API root.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// The question URL for `id`.
    pub fn question_url(&self, id: u64) -> String {
        format!("{}/questions/{id}", self.root)
    }
}

#[async_trait]
impl QuestionApi for StackExchangeClient {
    async fn fetch_question(&self, id: u64) -> Result<ApiReply, ApiError> {
        let url = self.question_url(id);
        let mut params = vec![
            ("order", "desc"),
            ("sort", "activity"),
            ("site", "stackoverflow"),
            ("filter", QUESTION_FILTER),
        ];
        if let Some(key) = &self.key {
            params.push(("key", key.as_str()));
        }

        tracing::info!(%url, "GET");
        let response = self.http.get(&url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Ok(ApiReply::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let decoded: QuestionResponse = serde_json::from_slice(&body)?;
        tracing::debug!(?decoded, "response");
        Ok(ApiReply::Ok(decoded))
    }
}

/// The single sleep-on-signal: once armed, the next caller of
/// [`wait`](BackoffGate::wait) sleeps until the deadline.
#[derive(Debug, Default)]
pub struct BackoffGate {
    until: Mutex<Option<Instant>>,
}

impl BackoffGate {
    /// Create a gate that is open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the gate for `delay` from now. A later deadline wins.
    pub fn defer(&self, delay: Duration) {
        let now = Instant::now();
        let deadline = now.checked_add(delay).unwrap_or(now + FAR_FUTURE);
        let mut until = self.until.lock().unwrap_or_else(|e| e.into_inner());
        if until.is_none_or(|current| current < deadline) {
            *until = Some(deadline);
        }
    }

    /// Sleeps until the gate reopens.
    pub async fn wait(&self) {
        let deadline = self.until.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(deadline) = deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !remaining.is_zero() {
                tracing::info!("Sleeping {} seconds.", remaining.as_secs_f64());
            }
            tokio::time::sleep_until(deadline).await;
        }
    }

    /// Whether a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.until
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

/// A fetched question plus the quota it left.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedQuestion {
    /// The question, answers included.
    pub post: Post,
    /// Requests left for today.
    pub quota_remaining: u32,
}

/// Question fetching with backoff and status handling.
pub struct QuestionService<A> {
    api: A,
    gate: BackoffGate,
}

impl<A: QuestionApi> QuestionService<A> {
    /// Wraps a raw API.
    pub fn new(api: A) -> Self {
        Self {
            api,
            gate: BackoffGate::new(),
        }
    }

    /// The backoff gate shared by every call.
    pub fn gate(&self) -> &BackoffGate {
        &self.gate
    }

    /// Fetches a question.
    ///
    /// Returns `Ok(None)` when the API answered with a non-200 status or an
    /// empty item list: there is nothing to post.
    pub async fn question(&self, id: u64) -> Result<Option<FetchedQuestion>, ApiError> {
        self.gate.wait().await;

        let response = match self.api.fetch_question(id).await? {
            ApiReply::Ok(response) => response,
            ApiReply::Status(code) => {
                tracing::error!(
                    question = id,
                    status = code,
                    "failed to get a valid response for question"
                );
                return Ok(None);
            }
        };

        tracing::info!("Quota remaining: {}.", response.quota_remaining);
        if let Some(seconds) = response.backoff {
            tracing::warn!("Backoff detected: {seconds}");
            self.gate.defer(Duration::from_secs(seconds));
        }

        let quota_remaining = response.quota_remaining;
        Ok(response
            .items
            .into_iter()
            .next()
            .map(|question| FetchedQuestion {
                post: Post::from(question),
                quota_remaining,
            }))
    }
}
