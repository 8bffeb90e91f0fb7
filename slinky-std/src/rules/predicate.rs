//! Predicate rule for ad-hoc filtering.

use slinky_core::{BoxError, Item, Rule, Verdict};

/// A rule backed by a closure. The closure returns `true` to block the item.
pub struct PredicateRule<F> {
    name: String,
    predicate: F,
}

impl<F> PredicateRule<F>
where
    F: Fn(&Item) -> bool + Send + Sync + 'static,
{
    /// Create a new predicate rule.
    pub fn new(name: impl Into<String>, predicate: F) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }
}

impl<F> Rule for PredicateRule<F>
where
    F: Fn(&Item) -> bool + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, item: &Item) -> Result<Verdict, BoxError> {
        Ok((self.predicate)(item).into())
    }
}
