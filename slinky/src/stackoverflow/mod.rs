//! StackOverflow answer bot.
//!
//! Watches submissions for links to StackOverflow questions and replies with
//! the question, its accepted answer and its best-rated answers, rendered as
//! Reddit markdown.
//!
//! - [`links`] finds question ids in free text
//! - [`api`] fetches questions and honours the API's backoff requests
//! - [`post`] and [`render`] model and format posts within a character budget
//! - [`select`] picks the answers worth posting
//! - [`handler`] ties it together as a [`Handler`](slinky_core::Handler)

pub mod api;
pub mod handler;
pub mod links;
pub mod post;
pub mod render;
pub mod select;

pub use api::{ApiError, BackoffGate, QuestionApi, QuestionService, StackExchangeClient};
pub use handler::StackOverflowHandler;
pub use links::question_ids;
pub use post::{Post, PostKind};
pub use render::{PostRenderer, Rendered};
pub use select::{Selection, select_answers};
