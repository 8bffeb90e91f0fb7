//! Configuration: immutable runtime settings and account credentials.
//!
//! Both are plain JSON files read once at startup and passed by reference
//! into the components that need them.

use crate::{error::ConfigError, feed::StreamOptions};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Default location of the credentials file.
pub const DEFAULT_CREDENTIALS_PATH: &str = "./config/auth.json";

/// Default location of the optional settings file.
pub const DEFAULT_SETTINGS_PATH: &str = "./config/settings.json";

/// Environment variable overriding [`DEFAULT_SETTINGS_PATH`].
pub const SETTINGS_ENV: &str = "SLINKY_SETTINGS";

/// Environment variable overriding [`DEFAULT_CREDENTIALS_PATH`].
pub const CREDENTIALS_ENV: &str = "SLINKY_CREDENTIALS";

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Subreddit to monitor, without the `r/` prefix.
    pub subreddit: String,
    /// Maximum characters in one rendered reply.
    pub post_char_max: usize,
    /// How many high-scoring answers are posted besides the accepted one.
    pub max_highest_rated: usize,
    /// Minimum score for an answer to count as high-scoring.
    pub min_score: i64,
    /// Authors whose items are never handled. The bot's own account is
    /// added at startup.
    pub skip_authors: Vec<String>,
    /// Live stream behaviour.
    pub stream: StreamOptions,
    /// Channel probed once at connect time.
    pub probe_channel: String,
    /// Number of items fetched by the probe.
    pub probe_limit: usize,
    /// Seconds between listing polls.
    pub poll_interval_secs: u64,
    /// Seconds a handler may spend on one item.
    pub handler_timeout_secs: u64,
    /// Directory for the debug and info log files.
    pub log_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            subreddit: "VBAMod".to_string(),
            post_char_max: 10_000,
            max_highest_rated: 2,
            min_score: 20,
            skip_authors: vec!["AutoModerator".to_string()],
            stream: StreamOptions::default(),
            probe_channel: "all".to_string(),
            probe_limit: 3,
            poll_interval_secs: 5,
            handler_timeout_secs: 60,
            log_dir: PathBuf::from("./logs"),
        }
    }
}

impl Settings {
    /// Loads settings from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        read_json(path)
    }

    /// Loads settings from `$SLINKY_SETTINGS` or the default path.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));
        Self::load(path)
    }

    /// Interval between listing polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Time limit for one handler action.
    pub fn handler_timeout(&self) -> Duration {
        Duration::from_secs(self.handler_timeout_secs)
    }
}

/// The Reddit account the bot posts as.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedditAccount {
    /// Account name, also added to the skipped authors.
    pub username: String,
    /// Account password for the password grant.
    pub password: String,
}

/// The registered Reddit script application.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCredentials {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// User agent sent with every request.
    pub user_agent: String,
}

/// The StackApps registration used for a higher API quota.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackApp {
    /// StackApps request key.
    pub key: String,
}

/// Everything needed to authenticate against Reddit and StackExchange.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// The bot account.
    #[serde(rename = "Reddit")]
    pub reddit: RedditAccount,
    /// The script application.
    #[serde(rename = "Praw")]
    pub app: AppCredentials,
    /// Optional StackApps key.
    #[serde(rename = "StackApp", default)]
    pub stack_app: Option<StackApp>,
}

impl Credentials {
    /// Loads credentials from `path`. Missing or malformed files are errors.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_json(path.as_ref())
    }

    /// Loads credentials from `$SLINKY_CREDENTIALS` or the default path.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CREDENTIALS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH));
        Self::load(path)
    }

    /// The StackApps key, if one is configured.
    pub fn stack_key(&self) -> Option<&str> {
        self.stack_app.as_ref().map(|app| app.key.as_str())
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.reddit.username)
            .field("client_id", &self.app.client_id)
            .field("user_agent", &self.app.user_agent)
            .field("stack_app", &self.stack_app.is_some())
            .finish_non_exhaustive()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const AUTH: &str = r#"{
        "Reddit": { "username": "slinky_bot", "password": "hunter2" },
        "Praw": { "client_id": "id", "client_secret": "secret", "user_agent": "slinky/0.1" },
        "StackApp": { "key": "so-key" }
    }"#;

    fn file_with(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_nested_credentials() {
        let file = file_with(AUTH);
        let creds = Credentials::load(file.path()).unwrap();
        assert_eq!(creds.reddit.username, "slinky_bot");
        assert_eq!(creds.app.user_agent, "slinky/0.1");
        assert_eq!(creds.stack_key(), Some("so-key"));
        assert!(!format!("{creds:?}").contains("hunter2"));
    }

    #[test]
    fn stack_app_is_optional() {
        let file = file_with(
            r#"{"Reddit":{"username":"u","password":"p"},
                "Praw":{"client_id":"i","client_secret":"s","user_agent":"a"}}"#,
        );
        assert_eq!(Credentials::load(file.path()).unwrap().stack_key(), None);
    }

    #[test]
    fn missing_credentials_are_fatal() {
        let err = Credentials::load("/nonexistent/auth.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_credentials_are_fatal() {
        let file = file_with(r#"{"Reddit": {"username": "u"}}"#);
        let err = Credentials::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn settings_default_when_absent_and_merge_partial_files() {
        assert_eq!(
            Settings::load("/nonexistent/settings.json").unwrap(),
            Settings::default()
        );

        let file = file_with(r#"{"subreddit": "rust", "stream": {"skip_existing": false}}"#);
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.subreddit, "rust");
        assert!(!settings.stream.skip_existing);
        assert_eq!(settings.post_char_max, 10_000);
        assert_eq!(settings.min_score, 20);
    }
}
