//! Replies to submissions that link StackOverflow questions.

use super::{
    api::{QuestionApi, QuestionService},
    links::question_ids,
    render::PostRenderer,
    select::select_answers,
};
use crate::{
    config::Settings,
    feed::{RedditSession, ReplyTarget},
};
use slinky_core::{BoxError, Handler, Item};
use std::sync::Arc;

/// For every linked question: a top-level reply with the question, and
/// under it the accepted answer followed by the best other answers.
pub struct StackOverflowHandler<A> {
    session: Arc<dyn RedditSession>,
    questions: QuestionService<A>,
    renderer: PostRenderer,
    min_score: i64,
    max_highest_rated: usize,
}

impl<A: QuestionApi> StackOverflowHandler<A> {
    /// Create a handler posting through `session`.
    pub fn new(session: Arc<dyn RedditSession>, api: A, settings: &Settings) -> Self {
        Self {
            session,
            questions: QuestionService::new(api),
            renderer: PostRenderer::new(settings.post_char_max),
            min_score: settings.min_score,
            max_highest_rated: settings.max_highest_rated,
        }
    }

    /// Posts the reply thread for one question. Returns `false` when the API
    /// had nothing to post.
    async fn answer_question(&self, target: &ReplyTarget, id: u64) -> Result<bool, BoxError> {
        let Some(fetched) = self.questions.question(id).await? else {
            return Ok(false);
        };

        let question = &fetched.post;
        let thread = self
            .session
            .reply(target, &self.renderer.render(question))
            .await?;

        let selection = select_answers(question.answers(), self.min_score, self.max_highest_rated);
        for answer in selection.accepted.into_iter().chain(selection.top_rated) {
            self.session
                .reply(&thread, &self.renderer.render(answer))
                .await?;
        }
        Ok(true)
    }
}

impl<A: QuestionApi> Handler for StackOverflowHandler<A> {
    fn name(&self) -> &str {
        "stackoverflow"
    }

    async fn act(&self, item: &Item) -> Result<(), BoxError> {
        let Some(submission) = item.as_submission() else {
            return Ok(());
        };

        let mut ids = question_ids(&submission.selftext);
        for id in question_ids(&submission.url) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        if ids.is_empty() {
            return Ok(());
        }

        let target = ReplyTarget::from(item);
        for id in ids {
            tracing::info!(submission = item.id(), question = id, "answering linked question");
            if !self.answer_question(&target, id).await? {
                tracing::info!(question = id, "nothing to post");
            }
        }
        Ok(())
    }
}
