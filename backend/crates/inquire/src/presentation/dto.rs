//! API DTOs (Data Transfer Objects)
//!
//! Public projections of the domain entities. Password hashes and timestamps
//! never leave the server.

use serde::Serialize;

use crate::domain::entity::{answer::Answer, question::Question, user::User};

// ============================================================================
// User
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub user_id: String,
    pub email: String,
    pub karma: i32,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.to_string(),
            email: user.email.as_str().to_string(),
            karma: user.karma,
        }
    }
}

// ============================================================================
// Question
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub user_id: String,
    pub question_id: String,
    pub question: String,
    pub latitude: f64,
    pub longitude: f64,
    pub closed: bool,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            user_id: question.user_id.to_string(),
            question_id: question.question_id.to_string(),
            question: question.question.as_str().to_string(),
            latitude: question.location.latitude(),
            longitude: question.location.longitude(),
            closed: question.closed,
        }
    }
}

// ============================================================================
// Answer
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AnswerView {
    pub user_id: String,
    pub answer_id: String,
    pub question_id: String,
    pub answer: String,
    pub accepted_answer: bool,
}

impl From<&Answer> for AnswerView {
    fn from(answer: &Answer) -> Self {
        Self {
            user_id: answer.user_id.to_string(),
            answer_id: answer.answer_id.to_string(),
            question_id: answer.question_id.to_string(),
            answer: answer.answer.as_str().to_string(),
            accepted_answer: answer.accepted,
        }
    }
}
