//! # slinky-core
//!
//! Core types for the Slinky subreddit monitor.
//!
//! This crate has minimal dependencies and is what rule and handler plugins
//! import. The standard rules, the handler registry and test doubles live in
//! `slinky-std`; the live monitor and the Reddit client live in `slinky`.
//!
//! # Layers
//!
//! ## Items ([`Item`])
//!
//! A tagged union of [`Submission`] and [`Comment`], owned by the monitor for
//! one dispatch cycle and lent to everything else.
//!
//! ## Rules ([`Rule`], [`FilterChain`])
//!
//! Named predicates returning a [`Verdict`]. A chain gives them OR-catch
//! semantics: any rule blocking blocks the item, an empty chain passes all.
//!
//! ## Handlers ([`Handler`], [`FilteredHandler`])
//!
//! Reactions to accepted items. Every handler can carry a private chain that
//! is consulted before its action runs.
//!
//! # Error Types
//!
//! - [`RuleError`] - A rule failed to evaluate
//! - [`HandlerError`] - A handler failed or was never specialized

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod filter;
mod handler;
mod item;
mod rule;

// Re-exports
pub use error::{BoxError, HandlerError, RuleError};
pub use filter::{DEFAULT_CHAIN_NAME, FilterChain};
pub use handler::{DynHandler, FilteredHandler, Handled, Handler};
pub use item::{Comment, Item, ItemKind, Submission};
pub use rule::{Rule, Verdict};
