//! # slinky-std
//!
//! Standard implementations for the Slinky subreddit monitor.
//!
//! This crate provides:
//! - **Rules**: [`PredicateRule`], [`AuthorRule`], [`FlairRule`], [`PatternRule`]
//! - **Handlers**: [`LoggingHandler`], and `TimeoutHandler` behind the
//!   `timeout` feature
//! - **Dispatch**: [`HandlerRegistry`], running handlers in registration
//!   order with per-handler fault isolation
//! - **Testing**: doubles in [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use slinky_core;

// Modules
pub mod handlers;
pub mod registry;
pub mod rules;
pub mod testing;

pub use handlers::LoggingHandler;
#[cfg(feature = "timeout")]
pub use handlers::TimeoutHandler;
pub use registry::{DispatchReport, HandlerRegistry, RegistryBuilder};
pub use rules::{AuthorRule, FlairRule, PatternRule, PredicateRule};
