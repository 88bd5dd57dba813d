//! Question Entity
//!
//! A geotagged question. `closed` flips to true exactly once, when one of
//! its answers is accepted.

use chrono::{DateTime, Utc};
use platform::geo::GeoPoint;

use crate::domain::value_object::{post_text::PostText, question_id::QuestionId, user_id::UserId};

#[derive(Debug, Clone)]
pub struct Question {
    pub question_id: QuestionId,
    /// Owner
    pub user_id: UserId,
    pub question: PostText,
    pub location: GeoPoint,
    pub closed: bool,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn new(user_id: UserId, question: PostText, location: GeoPoint) -> Self {
        Self {
            question_id: QuestionId::new(),
            user_id,
            question,
            location,
            closed: false,
            created_at: Utc::now(),
        }
    }

    pub fn is_open(&self) -> bool {
        !self.closed
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Close the question; returns false if it was already closed.
    pub fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_is_monotonic() {
        let mut question = Question::new(
            UserId::new(),
            PostText::new("question", "Best coffee nearby?").unwrap(),
            GeoPoint::new(37.33, -122.03).unwrap(),
        );
        assert!(question.is_open());
        assert!(question.close());
        assert!(!question.close());
        assert!(question.closed);
    }
}
