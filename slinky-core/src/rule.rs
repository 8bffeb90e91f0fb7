//! # Filter Rules
//!
//! The smallest unit of filtering: a named predicate over one [`Item`].
//!
//! A rule answers one question, "should this item be caught?", and never
//! touches the item. Rules are grouped into a [`FilterChain`], which gives
//! them OR-catch semantics: any rule blocking blocks the item.
//!
//! [`FilterChain`]: crate::FilterChain

use crate::{error::BoxError, item::Item};

/// Outcome of evaluating a rule against an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The item passes this rule; later rules still get a say.
    Pass,
    /// The item is caught by this rule and must not go further.
    Block,
}

impl Verdict {
    /// Whether this verdict blocks the item.
    pub fn is_block(self) -> bool {
        matches!(self, Verdict::Block)
    }
}

impl From<bool> for Verdict {
    /// `true` means "blocked".
    fn from(blocked: bool) -> Self {
        if blocked { Verdict::Block } else { Verdict::Pass }
    }
}

/// A predicate deciding whether an item is blocked.
///
/// Rules are shared as `Arc<dyn Rule>`; a chain treats two rules as the same
/// rule only when they are the same allocation.
///
/// # Example
///
/// ```rust,ignore
/// struct Unsolved;
///
/// impl Rule for Unsolved {
///     fn name(&self) -> &str { "unsolved" }
///
///     fn evaluate(&self, item: &Item) -> Result<Verdict, BoxError> {
///         let flair = item.as_submission().and_then(|s| s.link_flair_text.as_deref());
///         Ok((flair != Some("Unsolved")).into())
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a filter `Rule`",
    label = "missing `Rule` implementation",
    note = "Rules must implement `evaluate` and return `Verdict::Block` for items they catch."
)]
pub trait Rule: Send + Sync + 'static {
    /// A short name used in logs.
    fn name(&self) -> &str;

    /// Evaluates the item.
    fn evaluate(&self, item: &Item) -> Result<Verdict, BoxError>;
}
