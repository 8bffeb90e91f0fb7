//! Text pattern rule.

use regex::Regex;
use slinky_core::{BoxError, Item, Rule, Verdict};

/// Blocks items whose text does not match a regular expression.
///
/// Use [`PatternRule::blocking`] for the inverse: block items that do match.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    pattern: Regex,
    block_on_match: bool,
}

impl PatternRule {
    /// Lets through only items whose text matches `pattern`.
    pub fn requiring(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            block_on_match: false,
        })
    }

    /// Blocks items whose text matches `pattern`.
    pub fn blocking(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            block_on_match: true,
            ..Self::requiring(name, pattern)?
        })
    }
}

impl Rule for PatternRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, item: &Item) -> Result<Verdict, BoxError> {
        let matched = self.pattern.is_match(item.text());
        Ok((matched == self.block_on_match).into())
    }
}
