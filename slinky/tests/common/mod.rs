#![allow(dead_code)]

use async_trait::async_trait;
use slinky::{
    Comment, Item, Settings, Submission,
    stackoverflow::{
        ApiError, QuestionApi,
        api::{ApiAnswer, ApiComment, ApiOwner, ApiQuestion, ApiReply, QuestionResponse},
    },
};
use std::sync::{Arc, Mutex};

// ============================================================================
// Items
// ============================================================================

pub fn submission(id: &str, author: &str) -> Item {
    Submission {
        id: id.to_string(),
        author: author.to_string(),
        title: format!("title of {id}"),
        ..Default::default()
    }
    .into()
}

pub fn flaired(id: &str, flair: &str) -> Item {
    Submission {
        id: id.to_string(),
        author: "alice".to_string(),
        link_flair_text: Some(flair.to_string()),
        ..Default::default()
    }
    .into()
}

pub fn linking(id: &str, selftext: &str) -> Item {
    Submission {
        id: id.to_string(),
        author: "alice".to_string(),
        selftext: selftext.to_string(),
        ..Default::default()
    }
    .into()
}

pub fn comment(id: &str, author: &str) -> Item {
    Comment {
        id: id.to_string(),
        author: author.to_string(),
        body: "a comment".to_string(),
        ..Default::default()
    }
    .into()
}

pub fn settings() -> Settings {
    Settings {
        subreddit: "testsub".to_string(),
        ..Settings::default()
    }
}

// ============================================================================
// Question API
// ============================================================================

fn owner(name: &str) -> Option<ApiOwner> {
    Some(ApiOwner {
        display_name: Some(name.to_string()),
    })
}

/// Serves one canned question per id and records every request.
#[derive(Clone, Default)]
pub struct CannedQuestions {
    pub requested: Arc<Mutex<Vec<u64>>>,
}

#[async_trait]
impl QuestionApi for CannedQuestions {
    async fn fetch_question(&self, id: u64) -> Result<ApiReply, ApiError> {
        self.requested.lock().unwrap().push(id);
        if id == 0 {
            return Ok(ApiReply::Status(400));
        }

        let answer = |n: u64, score: i64, accepted: bool| ApiAnswer {
            answer_id: n,
            score,
            is_accepted: accepted,
            link: format!("https://stackoverflow.com/a/{n}"),
            owner: owner(&format!("answerer{n}")),
            body_markdown: format!("answer {n} with score {score}"),
            ..Default::default()
        };

        Ok(ApiReply::Ok(QuestionResponse {
            items: vec![ApiQuestion {
                question_id: id,
                title: format!("Question {id}"),
                score: 12,
                link: format!("https://stackoverflow.com/q/{id}"),
                owner: owner("asker"),
                body_markdown: "How do I &quot;do&quot; this?".to_string(),
                comments: vec![ApiComment {
                    comment_id: 1,
                    score: 2,
                    link: "https://stackoverflow.com/c/1".to_string(),
                    owner: owner("commenter"),
                    body_markdown: "duplicate?".to_string(),
                }],
                answers: vec![
                    answer(1, 3, false),
                    answer(2, 40, true),
                    answer(3, 90, false),
                    answer(4, 25, false),
                    answer(5, 60, false),
                ],
                ..Default::default()
            }],
            quota_remaining: 9_000,
            quota_max: 10_000,
            backoff: None,
        }))
    }
}
