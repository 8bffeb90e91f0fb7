//! # Filter Chain
//!
//! An ordered set of [`Rule`]s with OR-catch semantics: the chain blocks an
//! item as soon as one rule blocks it, and an empty chain lets everything
//! through.
//!
//! Rule failures are not caught here. They surface as [`RuleError`] so the
//! caller decides whether a broken rule skips the item or stops the stream.

use crate::{
    error::RuleError,
    item::Item,
    rule::{Rule, Verdict},
};
use std::{fmt, sync::Arc};

/// Default name for chains created without one.
pub const DEFAULT_CHAIN_NAME: &str = "()";

/// An ordered collection of rules.
#[derive(Clone)]
pub struct FilterChain {
    name: String,
    rules: Vec<Arc<dyn Rule>>,
}

impl FilterChain {
    /// Creates an empty chain with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// The chain's name, as it appears in block traces.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a rule unless that exact rule is already present.
    ///
    /// Returns `true` if the rule was added.
    pub fn add_rule(&mut self, rule: Arc<dyn Rule>) -> bool {
        if self.contains(&rule) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    /// Builder-style [`add_rule`](Self::add_rule).
    pub fn with_rule(mut self, rule: Arc<dyn Rule>) -> Self {
        self.add_rule(rule);
        self
    }

    /// Removes the rule if present. Returns `true` if it was removed.
    pub fn remove_rule(&mut self, rule: &Arc<dyn Rule>) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| !Arc::ptr_eq(r, rule));
        self.rules.len() != before
    }

    /// Whether this exact rule is part of the chain.
    pub fn contains(&self, rule: &Arc<dyn Rule>) -> bool {
        self.rules.iter().any(|r| Arc::ptr_eq(r, rule))
    }

    /// Tests the item against every rule in insertion order.
    ///
    /// Returns `Ok(true)` if the item is caught (blocked) by a rule and
    /// `Ok(false)` if it passes.
    pub fn test(&self, item: &Item) -> Result<bool, RuleError> {
        for rule in &self.rules {
            let verdict = rule
                .evaluate(item)
                .map_err(|source| RuleError::Evaluation {
                    rule: rule.name().to_string(),
                    item: item.id().to_string(),
                    source,
                })?;

            if verdict == Verdict::Block {
                tracing::debug!(
                    item = item.id(),
                    chain = %self.name,
                    rule = rule.name(),
                    "item blocked"
                );
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Number of rules in the chain.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the chain has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new(DEFAULT_CHAIN_NAME)
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("name", &self.name)
            .field(
                "rules",
                &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
