//! The bot: one submission monitor answering StackOverflow links.

use crate::{
    config::{Credentials, Settings},
    error::{RedditError, Result},
    feed::RedditSession,
    monitor::{MonitorReport, StreamMonitor},
    reddit::RedditClient,
    stackoverflow::{QuestionApi, StackExchangeClient, StackOverflowHandler},
};
use slinky_std::{AuthorRule, LoggingHandler, TimeoutHandler};
use std::{iter, sync::Arc, time::Duration};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the submission monitor.
///
/// Items by `username` or any configured skip author never reach the
/// handlers. Accepted submissions are logged, then answered.
pub fn build_monitor<A: QuestionApi>(
    settings: &Settings,
    session: Arc<dyn RedditSession>,
    api: A,
    username: &str,
) -> StreamMonitor {
    let mut monitor = StreamMonitor::submissions(settings);

    let skipped = settings
        .skip_authors
        .iter()
        .cloned()
        .chain(iter::once(username.to_string()));
    monitor.add_rule(Arc::new(AuthorRule::new(skipped)));

    monitor.add_handler(LoggingHandler::with_level(tracing::Level::INFO));
    monitor.add_handler(TimeoutHandler::new(
        StackOverflowHandler::new(session, api, settings),
        settings.handler_timeout(),
    ));
    monitor
}

/// Logs in, connects, and monitors until Ctrl-C or the feed ends.
pub async fn run(settings: Settings, credentials: Credentials) -> Result<MonitorReport> {
    let http = reqwest::Client::builder()
        .user_agent(credentials.app.user_agent.clone())
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(RedditError::from)?;

    let stack = StackExchangeClient::new(http.clone(), credentials.stack_key().map(str::to_string));
    let reddit = RedditClient::login(http, credentials, settings.poll_interval()).await?;
    let username = reddit.username().to_string();
    let session: Arc<dyn RedditSession> = Arc::new(reddit);

    let mut monitor = build_monitor(&settings, session.clone(), stack, &username);

    let stop = monitor.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown requested");
            stop.cancel();
        }
    });

    monitor.connect(session).await?;
    Ok(monitor.monitor().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        stackoverflow::{ApiError, api::ApiReply},
        testing::MockSession,
    };
    use async_trait::async_trait;
    use slinky_core::{Item, Submission};

    struct NoQuestions;

    #[async_trait]
    impl QuestionApi for NoQuestions {
        async fn fetch_question(&self, _id: u64) -> std::result::Result<ApiReply, ApiError> {
            Ok(ApiReply::Status(404))
        }
    }

    fn by(author: &str) -> Item {
        Submission {
            id: author.to_lowercase(),
            author: author.into(),
            ..Default::default()
        }
        .into()
    }

    #[tokio::test]
    async fn own_and_skipped_authors_are_blocked() {
        let session = MockSession::with_feed(vec![by("AutoModerator"), by("slinky_bot"), by("alice")]);
        let shared: Arc<dyn RedditSession> = Arc::new(session.clone());
        let mut monitor = build_monitor(&Settings::default(), shared.clone(), NoQuestions, "slinky_bot");

        assert_eq!(monitor.handlers().len(), 2);
        monitor.connect(shared).await.unwrap();
        let report = monitor.monitor().await.unwrap();

        assert_eq!(report.blocked, 2);
        assert_eq!(report.dispatched, 1);
        assert_eq!(report.handler_failures, 0);
    }
}
