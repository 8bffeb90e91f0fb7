//! Flair rule for submissions.

use slinky_core::{BoxError, Item, Rule, Verdict};

/// Lets through only submissions carrying the expected link flair.
///
/// Comments carry no flair and always pass; put this rule on a submission
/// monitor or a handler that only sees submissions.
#[derive(Debug, Clone)]
pub struct FlairRule {
    flair: String,
}

impl FlairRule {
    /// Create a rule requiring the given flair text.
    pub fn new(flair: impl Into<String>) -> Self {
        Self {
            flair: flair.into(),
        }
    }
}

impl Rule for FlairRule {
    fn name(&self) -> &str {
        "flair"
    }

    fn evaluate(&self, item: &Item) -> Result<Verdict, BoxError> {
        let Some(submission) = item.as_submission() else {
            return Ok(Verdict::Pass);
        };
        Ok((submission.link_flair_text.as_deref() != Some(self.flair.as_str())).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slinky_core::{Comment, Submission};

    #[test]
    fn requires_matching_flair() {
        let rule = FlairRule::new("Unsolved");
        let flaired = |flair: Option<&str>| -> Item {
            Submission {
                link_flair_text: flair.map(str::to_string),
                ..Default::default()
            }
            .into()
        };

        assert_eq!(rule.evaluate(&flaired(Some("Unsolved"))).unwrap(), Verdict::Pass);
        assert_eq!(rule.evaluate(&flaired(Some("Solved"))).unwrap(), Verdict::Block);
        assert_eq!(rule.evaluate(&flaired(None)).unwrap(), Verdict::Block);
        assert_eq!(
            rule.evaluate(&Comment::default().into()).unwrap(),
            Verdict::Pass
        );
    }
}
