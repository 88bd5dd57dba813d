//! Answer Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    answer_id::AnswerId, post_text::PostText, question_id::QuestionId, user_id::UserId,
};

#[derive(Debug, Clone)]
pub struct Answer {
    pub answer_id: AnswerId,
    pub question_id: QuestionId,
    /// Author
    pub user_id: UserId,
    pub answer: PostText,
    /// At most one answer per question is ever accepted
    pub accepted: bool,
    pub created_at: DateTime<Utc>,
}

impl Answer {
    pub fn new(question_id: QuestionId, user_id: UserId, answer: PostText) -> Self {
        Self {
            answer_id: AnswerId::new(),
            question_id,
            user_id,
            answer,
            accepted: false,
            created_at: Utc::now(),
        }
    }
}
