//! # slinky - Subreddit Monitor
//!
//! `slinky` watches a subreddit's live feed and hands each new item to a set
//! of pluggable handlers. Two layers of filter chains decide what gets
//! through: one on the monitor, one per handler.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use slinky::prelude::*;
//!
//! let mut monitor = StreamMonitor::submissions(&settings);
//! monitor.add_rule(Arc::new(AuthorRule::new(["AutoModerator"])));
//! monitor.add_handler(LoggingHandler::new());
//!
//! monitor.connect(session).await?;
//! let report = monitor.monitor().await?;
//! ```
//!
//! The bundled bot ([`app::run`]) answers submissions that link
//! StackOverflow questions; see [`stackoverflow`].

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod app;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod monitor;
pub mod reddit;
pub mod stackoverflow;
pub mod testing;

pub use slinky_core::{
    BoxError, Comment, DEFAULT_CHAIN_NAME, DynHandler, FilterChain, FilteredHandler, Handled,
    Handler, HandlerError, Item, ItemKind, Rule, RuleError, Submission, Verdict,
};

pub use slinky_std::{
    AuthorRule, DispatchReport, FlairRule, HandlerRegistry, LoggingHandler, PatternRule,
    PredicateRule, RegistryBuilder, TimeoutHandler,
};

pub use config::{Credentials, Settings};
pub use error::{Error, Result};
pub use feed::{RedditSession, ReplyTarget, StreamOptions};
pub use monitor::{MonitorReport, MonitorState, StreamMonitor};
pub use reddit::RedditClient;

/// Prelude module - common imports for Slinky.
///
/// # Usage
///
/// ```rust,ignore
/// use slinky::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Rules
        AuthorRule,
        BoxError,
        FilterChain,
        FilteredHandler,
        FlairRule,
        // Handlers
        Handler,
        Item,
        ItemKind,
        LoggingHandler,
        PatternRule,
        PredicateRule,
        // Session
        RedditSession,
        ReplyTarget,
        Rule,
        Settings,
        // Monitoring
        StreamMonitor,
        Verdict,
    };
    pub use std::sync::Arc;
}
