//! Choosing which answers to post.

use super::post::Post;

/// The answers worth replying with.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    /// The accepted answer, if there is one.
    pub accepted: Option<&'a Post>,
    /// The best other answers, highest score first.
    pub top_rated: Vec<&'a Post>,
}

/// Picks the accepted answer plus up to `max_highest_rated` other answers
/// scoring at least `min_score`.
pub fn select_answers(answers: &[Post], min_score: i64, max_highest_rated: usize) -> Selection<'_> {
    let accepted = answers.iter().find(|a| a.is_accepted());

    let mut top_rated: Vec<&Post> = answers
        .iter()
        .filter(|a| !a.is_accepted() && a.score >= min_score)
        .collect();
    top_rated.sort_by(|a, b| b.score.cmp(&a.score));
    top_rated.truncate(max_highest_rated);

    Selection {
        accepted,
        top_rated,
    }
}
