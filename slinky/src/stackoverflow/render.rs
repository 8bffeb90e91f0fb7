//! Markdown rendering of posts for Reddit replies.
//!
//! Every rendered reply fits in a fixed character budget. Comments are added
//! one at a time until the next one would not fit; whatever is assembled is
//! then hard-capped to the budget.

use super::post::{Post, PostKind};

/// A rendered post plus what had to be left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// The markdown, never longer than the budget.
    pub text: String,
    /// Child comments that did not fit.
    pub omitted_comments: usize,
    /// Whether the final hard cap cut the text.
    pub truncated: bool,
}

/// Renders posts within a character budget.
#[derive(Debug, Clone, Copy)]
pub struct PostRenderer {
    budget: usize,
}

impl PostRenderer {
    /// Create a renderer for replies of at most `budget` characters.
    pub fn new(budget: usize) -> Self {
        Self { budget }
    }

    /// The character budget.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Renders a post to markdown.
    pub fn render(&self, post: &Post) -> String {
        self.render_with_report(post).text
    }

    /// Renders a post and reports what was omitted.
    pub fn render_with_report(&self, post: &Post) -> Rendered {
        if post.kind == PostKind::Comment {
            let text = render_comment(post);
            let len = text.chars().count();
            return self.cap(text, len, 0);
        }

        let title = match &post.kind {
            PostKind::Question { title, .. } => format!("##{title}"),
            _ => String::new(),
        };
        let mut text = format!("{title}\n\n{}\n\n{}\n", post.body(), footer(post));
        let mut len = text.chars().count();
        let mut omitted = 0;

        if !post.comments.is_empty() {
            text.push_str("\n_Comments_\n");
            len += "\n_Comments_\n".len();

            let total = post.comments.len();
            for (i, comment) in post.comments.iter().enumerate() {
                let rendered = render_comment(comment);
                if len + rendered.chars().count() > self.budget {
                    omitted = total - i;
                    tracing::warn!(omitted, "{omitted} comments truncated due to post length.");
                    break;
                }
                let entry = format!("\n{}. {rendered}", i + 1);
                len += entry.chars().count();
                text.push_str(&entry);
            }
        }

        self.cap(text, len, omitted)
    }

    fn cap(&self, mut text: String, len: usize, omitted_comments: usize) -> Rendered {
        let truncated = len > self.budget;
        if truncated {
            tracing::warn!(len, budget = self.budget, "Post truncated. Exceeds max length ({len}).");
            if let Some((cut, _)) = text.char_indices().nth(self.budget) {
                text.truncate(cut);
            }
        }
        Rendered {
            text,
            omitted_comments,
            truncated,
        }
    }
}

/// `^score: N - author: NAME`, each word superscripted.
fn footer(post: &Post) -> String {
    let accepted = if post.is_accepted() {
        " - accepted answer"
    } else {
        ""
    };
    format!("^score: {} - author: {}{accepted}", post.score, post.author)
        .replace(' ', " ^")
        .replace(" ^ ", "  ")
}

fn render_comment(comment: &Post) -> String {
    format!(
        "[{}]({}) - {} - {}",
        comment.score,
        comment.link,
        comment.body(),
        comment.author
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(n: usize, body: &str) -> Post {
        Post {
            kind: PostKind::Comment,
            link: format!("https://so/c/{n}"),
            score: n as i64,
            author: format!("user{n}"),
            body_markdown: body.to_string(),
            comments: Vec::new(),
        }
    }

    fn answer(body: &str, accepted: bool, comments: Vec<Post>) -> Post {
        Post {
            kind: PostKind::Answer {
                is_accepted: accepted,
            },
            link: "https://so/a/1".into(),
            score: 42,
            author: "answerer".into(),
            body_markdown: body.to_string(),
            comments,
        }
    }

    #[test]
    fn footer_superscripts_each_word() {
        assert_eq!(
            footer(&answer("", false, vec![])),
            "^score: ^42 ^- ^author: ^answerer"
        );
        assert_eq!(
            footer(&answer("", true, vec![])),
            "^score: ^42 ^- ^author: ^answerer ^- ^accepted ^answer"
        );
    }

    #[test]
    fn question_layout() {
        let question = Post {
            kind: PostKind::Question {
                title: "Title".into(),
                answers: vec![],
            },
            link: "https://so/q/1".into(),
            score: 5,
            author: "asker".into(),
            body_markdown: "Body &amp; more".into(),
            comments: vec![comment(1, "first"), comment(2, "second")],
        };

        let rendered = PostRenderer::new(10_000).render(&question);
        assert_eq!(
            rendered,
            "##Title\n\nBody & more\n\n^score: ^5 ^- ^author: ^asker\n\
             \n_Comments_\n\
             \n1. [1](https://so/c/1) - first - user1\
             \n2. [2](https://so/c/2) - second - user2"
        );
    }

    #[test]
    fn answer_without_comments_has_no_comment_header() {
        let rendered = PostRenderer::new(10_000).render(&answer("text", true, vec![]));
        assert_eq!(
            rendered,
            "\n\ntext\n\n^score: ^42 ^- ^author: ^answerer ^- ^accepted ^answer\n"
        );
    }

    #[test]
    fn comment_layout() {
        assert_eq!(
            PostRenderer::new(100).render(&comment(3, "it &lt;works&gt;")),
            "[3](https://so/c/3) - it <works> - user3"
        );
    }

    #[test]
    fn body_near_budget_drops_comments_and_caps() {
        // Header and footer take 50 characters around the body and each
        // comment renders to 70. With a 378 character body the first comment
        // passes the check, its "\n1. " prefix overshoots, and the rest are
        // dropped.
        let budget = 500;
        let comments = (1..=5).map(|n| comment(n, &"c".repeat(40))).collect();
        let post = answer(&"x".repeat(378), false, comments);

        let rendered = PostRenderer::new(budget).render_with_report(&post);

        assert_eq!(rendered.omitted_comments, 4);
        assert!(rendered.truncated);
        assert_eq!(rendered.text.chars().count(), budget);
        assert!(rendered.text.contains("\n1. [1]"));
    }

    #[test]
    fn body_over_budget_is_cut_on_char_boundary() {
        let post = answer(&"é".repeat(50), false, vec![comment(1, "c")]);
        let rendered = PostRenderer::new(20).render_with_report(&post);

        assert_eq!(rendered.omitted_comments, 1);
        assert_eq!(rendered.text.chars().count(), 20);
    }

    #[test]
    fn short_post_is_untouched() {
        let post = answer("short", false, vec![comment(1, "c")]);
        let rendered = PostRenderer::new(10_000).render_with_report(&post);
        assert_eq!(rendered.omitted_comments, 0);
        assert!(!rendered.truncated);
    }
}
