//! # Items
//!
//! The values flowing through a monitor: Reddit submissions and comments.
//!
//! An [`Item`] is owned by the monitor for one dispatch cycle; rules and
//! handlers only ever borrow it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two kinds of item a subreddit stream can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A link or self post.
    Submission,
    /// A comment on a submission.
    Comment,
}

impl ItemKind {
    /// The Reddit "thing" prefix used to build fullnames.
    pub fn type_prefix(self) -> &'static str {
        match self {
            ItemKind::Submission => "t3",
            ItemKind::Comment => "t1",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Submission => f.write_str("submission"),
            ItemKind::Comment => f.write_str("comment"),
        }
    }
}

/// A Reddit submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Submission {
    /// Base-36 id without the `t3_` prefix.
    pub id: String,
    /// Author username.
    pub author: String,
    /// Post title.
    pub title: String,
    /// Markdown body of a self post. Empty for link posts.
    pub selftext: String,
    /// Flair text, if the post has one.
    pub link_flair_text: Option<String>,
    /// Site-relative link to the post.
    pub permalink: String,
    /// Linked URL, or the post itself for self posts.
    pub url: String,
    /// Creation time as a unix timestamp.
    pub created_utc: f64,
}

/// A Reddit comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    /// Base-36 id without the `t1_` prefix.
    pub id: String,
    /// Author username.
    pub author: String,
    /// Markdown body.
    pub body: String,
    /// Fullname of the submission the comment belongs to.
    pub link_id: String,
    /// Fullname of the submission or comment this one answers.
    pub parent_id: String,
    /// Site-relative link to the comment.
    pub permalink: String,
    /// Creation time as a unix timestamp.
    pub created_utc: f64,
}

/// A submission or comment pulled from a live feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Item {
    /// A submission.
    Submission(Submission),
    /// A comment.
    Comment(Comment),
}

impl Item {
    /// The item's base-36 id, without type prefix.
    pub fn id(&self) -> &str {
        match self {
            Item::Submission(s) => &s.id,
            Item::Comment(c) => &c.id,
        }
    }

    /// The author's username. Deleted authors are reported as `[deleted]`.
    pub fn author(&self) -> &str {
        match self {
            Item::Submission(s) => &s.author,
            Item::Comment(c) => &c.author,
        }
    }

    /// Which variant this is.
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Submission(_) => ItemKind::Submission,
            Item::Comment(_) => ItemKind::Comment,
        }
    }

    /// The free text of the item: selftext for submissions, body for comments.
    pub fn text(&self) -> &str {
        match self {
            Item::Submission(s) => &s.selftext,
            Item::Comment(c) => &c.body,
        }
    }

    /// Creation time in seconds since the epoch.
    pub fn created_utc(&self) -> f64 {
        match self {
            Item::Submission(s) => s.created_utc,
            Item::Comment(c) => c.created_utc,
        }
    }

    /// The `t3_<id>` / `t1_<id>` fullname Reddit uses to address the item.
    pub fn fullname(&self) -> String {
        format!("{}_{}", self.kind().type_prefix(), self.id())
    }

    /// Returns the submission, if this is one.
    pub fn as_submission(&self) -> Option<&Submission> {
        match self {
            Item::Submission(s) => Some(s),
            Item::Comment(_) => None,
        }
    }

    /// Returns the comment, if this is one.
    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Item::Comment(c) => Some(c),
            Item::Submission(_) => None,
        }
    }
}

impl From<Submission> for Item {
    fn from(submission: Submission) -> Self {
        Item::Submission(submission)
    }
}

impl From<Comment> for Item {
    fn from(comment: Comment) -> Self {
        Item::Comment(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_follow_the_variant() {
        let item: Item = Submission {
            id: "abc".into(),
            author: "alice".into(),
            selftext: "hello".into(),
            ..Default::default()
        }
        .into();

        assert_eq!(item.id(), "abc");
        assert_eq!(item.author(), "alice");
        assert_eq!(item.text(), "hello");
        assert_eq!(item.kind(), ItemKind::Submission);
        assert_eq!(item.fullname(), "t3_abc");
        assert!(item.as_comment().is_none());

        let item: Item = Comment {
            id: "xyz".into(),
            body: "reply".into(),
            ..Default::default()
        }
        .into();
        assert_eq!(item.fullname(), "t1_xyz");
        assert_eq!(item.text(), "reply");
    }

    #[test]
    fn submission_deserializes_from_listing_data() {
        let json = r#"{"id":"1a2b","author":"bob","title":"Help","selftext":"body","link_flair_text":null,"extra":1}"#;
        let submission: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.id, "1a2b");
        assert_eq!(submission.link_flair_text, None);
        assert!(submission.permalink.is_empty());
    }
}
