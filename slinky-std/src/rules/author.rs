//! Author skip-list rule.

use slinky_core::{BoxError, Item, Rule, Verdict};

/// Blocks items written by any of the listed accounts.
///
/// The bot's own account and `AutoModerator` are the usual entries, so the
/// bot never answers itself. Matching ignores ASCII case, as Reddit
/// usernames do.
#[derive(Debug, Clone)]
pub struct AuthorRule {
    authors: Vec<String>,
}

impl AuthorRule {
    /// Create a rule blocking the given authors.
    pub fn new<I, S>(authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            authors: authors.into_iter().map(Into::into).collect(),
        }
    }

    /// The blocked authors.
    pub fn authors(&self) -> &[String] {
        &self.authors
    }
}

impl Rule for AuthorRule {
    fn name(&self) -> &str {
        "skip-authors"
    }

    fn evaluate(&self, item: &Item) -> Result<Verdict, BoxError> {
        let author = item.author();
        Ok(self
            .authors
            .iter()
            .any(|a| a.eq_ignore_ascii_case(author))
            .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slinky_core::Comment;

    fn by(author: &str) -> Item {
        Comment {
            id: "c".into(),
            author: author.into(),
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn blocks_listed_authors_only() {
        let rule = AuthorRule::new(["slinky_bot", "AutoModerator"]);
        assert_eq!(rule.evaluate(&by("automoderator")).unwrap(), Verdict::Block);
        assert_eq!(rule.evaluate(&by("slinky_bot")).unwrap(), Verdict::Block);
        assert_eq!(rule.evaluate(&by("someone")).unwrap(), Verdict::Pass);
    }
}
