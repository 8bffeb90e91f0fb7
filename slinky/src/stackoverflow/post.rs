//! The question/answer/comment model.
//!
//! All three share the fields a rendering needs; the [`PostKind`] tag carries
//! what is specific to each.

use super::api::{ApiAnswer, ApiComment, ApiOwner, ApiQuestion};

/// Variant-specific data of a [`Post`].
#[derive(Debug, Clone, PartialEq)]
pub enum PostKind {
    /// A question, with its answers.
    Question {
        /// The question title.
        title: String,
        /// Answers, in API order.
        answers: Vec<Post>,
    },
    /// An answer.
    Answer {
        /// Whether the asker accepted this answer.
        is_accepted: bool,
    },
    /// A comment on a question or answer. Comments have no children.
    Comment,
}

/// A StackOverflow post of any kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// What kind of post this is.
    pub kind: PostKind,
    /// Permanent link to the post.
    pub link: String,
    /// Net vote score.
    pub score: i64,
    /// Display name of the owner, `[deleted]` when gone.
    pub author: String,
    /// The body as markdown, still HTML-escaped the way the API returns it.
    pub body_markdown: String,
    /// Comments on the post, in API order.
    pub comments: Vec<Post>,
}

impl Post {
    /// The question title, if this is a question.
    pub fn title(&self) -> Option<&str> {
        match &self.kind {
            PostKind::Question { title, .. } => Some(title),
            _ => None,
        }
    }

    /// The answers, if this is a question; empty otherwise.
    pub fn answers(&self) -> &[Post] {
        match &self.kind {
            PostKind::Question { answers, .. } => answers,
            _ => &[],
        }
    }

    /// Whether this is an accepted answer.
    pub fn is_accepted(&self) -> bool {
        matches!(self.kind, PostKind::Answer { is_accepted: true })
    }

    /// The body with HTML entities decoded.
    pub fn body(&self) -> String {
        html_escape::decode_html_entities(&self.body_markdown).into_owned()
    }
}

fn display_name(owner: Option<ApiOwner>) -> String {
    owner
        .and_then(|o| o.display_name)
        .map(|name| html_escape::decode_html_entities(&name).into_owned())
        .unwrap_or_else(|| "[deleted]".to_string())
}

impl From<ApiComment> for Post {
    fn from(comment: ApiComment) -> Self {
        Post {
            kind: PostKind::Comment,
            link: comment.link,
            score: comment.score,
            author: display_name(comment.owner),
            body_markdown: comment.body_markdown,
            comments: Vec::new(),
        }
    }
}

impl From<ApiAnswer> for Post {
    fn from(answer: ApiAnswer) -> Self {
        Post {
            kind: PostKind::Answer {
                is_accepted: answer.is_accepted,
            },
            link: answer.link,
            score: answer.score,
            author: display_name(answer.owner),
            body_markdown: answer.body_markdown,
            comments: answer.comments.into_iter().map(Post::from).collect(),
        }
    }
}

impl From<ApiQuestion> for Post {
    fn from(question: ApiQuestion) -> Self {
        Post {
            kind: PostKind::Question {
                title: html_escape::decode_html_entities(&question.title).into_owned(),
                answers: question.answers.into_iter().map(Post::from).collect(),
            },
            link: question.link,
            score: question.score,
            author: display_name(question.owner),
            body_markdown: question.body_markdown,
            comments: question.comments.into_iter().map(Post::from).collect(),
        }
    }
}
