//! In-memory repository
//!
//! Implements every repository trait over one mutex-guarded state. Used by
//! tests and by local runs without PostgreSQL. Multi-entity writes
//! (`accept`) happen under a single guard, so they are atomic here too.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use platform::geo::{BoundingBox, GeoPoint};
use uuid::Uuid;

use crate::domain::entity::{answer::Answer, question::Question, session::Session, user::User};
use crate::domain::repository::{
    AnswerRepository, QuestionRepository, SessionRepository, UserRepository,
};
use crate::domain::value_object::{
    answer_id::AnswerId, email::Email, question_id::QuestionId, user_id::UserId,
};
use crate::error::{InquireError, InquireResult};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    questions: HashMap<QuestionId, Question>,
    /// Insertion order doubles as creation order.
    answers: Vec<Answer>,
    sessions: HashMap<Uuid, Session>,
}

/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> InquireResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| InquireError::Internal("in-memory store lock poisoned".to_string()))
    }

    /// Bypass the email uniqueness check, to simulate a corrupted store
    #[cfg(test)]
    pub(crate) fn insert_user_unchecked(&self, user: User) {
        if let Ok(mut state) = self.state.lock() {
            state.users.insert(user.user_id, user);
        }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for InMemoryRepository {
    async fn create(&self, user: &User) -> InquireResult<()> {
        let mut state = self.lock()?;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(InquireError::EmailTaken);
        }
        state.users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> InquireResult<Option<User>> {
        Ok(self.lock()?.users.get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> InquireResult<Vec<User>> {
        Ok(self
            .lock()?
            .users
            .values()
            .filter(|u| &u.email == email)
            .cloned()
            .collect())
    }

    async fn exists_by_email(&self, email: &Email) -> InquireResult<bool> {
        Ok(self.lock()?.users.values().any(|u| &u.email == email))
    }

    async fn update(&self, user: &User) -> InquireResult<()> {
        let mut state = self.lock()?;
        if let Some(stored) = state.users.get_mut(&user.user_id) {
            *stored = user.clone();
        }
        Ok(())
    }
}

// ============================================================================
// Question Repository Implementation
// ============================================================================

impl QuestionRepository for InMemoryRepository {
    async fn create(&self, question: &Question) -> InquireResult<()> {
        self.lock()?
            .questions
            .insert(question.question_id, question.clone());
        Ok(())
    }

    async fn find_by_id(&self, question_id: &QuestionId) -> InquireResult<Option<Question>> {
        Ok(self.lock()?.questions.get(question_id).cloned())
    }

    async fn update(&self, question: &Question) -> InquireResult<()> {
        let mut state = self.lock()?;
        if let Some(stored) = state.questions.get_mut(&question.question_id) {
            // closed never reverts
            let closed = stored.closed || question.closed;
            *stored = question.clone();
            stored.closed = closed;
        }
        Ok(())
    }

    async fn find_nearby(
        &self,
        center: &GeoPoint,
        max_results: u32,
        max_distance_km: f64,
    ) -> InquireResult<Vec<Question>> {
        let bbox = BoundingBox::around(center, max_distance_km);
        let state = self.lock()?;

        let mut hits: Vec<(f64, &Question)> = state
            .questions
            .values()
            .filter(|q| q.is_open() && bbox.contains(&q.location))
            .map(|q| (center.distance_km(&q.location), q))
            .filter(|(distance, _)| *distance <= max_distance_km)
            .collect();

        hits.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(hits
            .into_iter()
            .take(max_results as usize)
            .map(|(_, q)| q.clone())
            .collect())
    }
}

// ============================================================================
// Answer Repository Implementation
// ============================================================================

impl AnswerRepository for InMemoryRepository {
    async fn create(&self, answer: &Answer) -> InquireResult<()> {
        let mut state = self.lock()?;
        let question = state
            .questions
            .get(&answer.question_id)
            .ok_or(InquireError::QuestionNotFound)?;
        if question.closed {
            return Err(InquireError::QuestionClosed);
        }
        state.answers.push(answer.clone());
        Ok(())
    }

    async fn find_by_id(&self, answer_id: &AnswerId) -> InquireResult<Option<Answer>> {
        Ok(self
            .lock()?
            .answers
            .iter()
            .find(|a| &a.answer_id == answer_id)
            .cloned())
    }

    async fn find_by_question(&self, question_id: &QuestionId) -> InquireResult<Vec<Answer>> {
        Ok(self
            .lock()?
            .answers
            .iter()
            .filter(|a| &a.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn update(&self, answer: &Answer) -> InquireResult<()> {
        let mut state = self.lock()?;
        if let Some(stored) = state
            .answers
            .iter_mut()
            .find(|a| a.answer_id == answer.answer_id)
        {
            let accepted = stored.accepted || answer.accepted;
            *stored = answer.clone();
            stored.accepted = accepted;
        }
        Ok(())
    }

    async fn accept(&self, answer: &Answer) -> InquireResult<()> {
        let mut guard = self.lock()?;
        let state = &mut *guard;

        // Validate everything before the first write.
        let question = state
            .questions
            .get(&answer.question_id)
            .ok_or(InquireError::QuestionNotFound)?;
        if question.closed {
            return Err(InquireError::AlreadyAccepted);
        }
        let answer_index = state
            .answers
            .iter()
            .position(|a| a.answer_id == answer.answer_id && a.question_id == answer.question_id)
            .ok_or(InquireError::AnswerNotFound)?;
        let author_id = state.answers[answer_index].user_id;
        if !state.users.contains_key(&author_id) {
            return Err(InquireError::Internal(format!(
                "answer {} has no author",
                answer.answer_id
            )));
        }

        if let Some(question) = state.questions.get_mut(&answer.question_id) {
            question.close();
        }
        state.answers[answer_index].accepted = true;
        if let Some(author) = state.users.get_mut(&author_id) {
            author.award_karma();
        }

        Ok(())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for InMemoryRepository {
    async fn create(&self, session: &Session) -> InquireResult<()> {
        self.lock()?
            .sessions
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> InquireResult<Option<Session>> {
        Ok(self.lock()?.sessions.get(&session_id).cloned())
    }

    async fn update(&self, session: &Session) -> InquireResult<()> {
        let mut state = self.lock()?;
        // A session deleted meanwhile stays deleted.
        if let Some(stored) = state.sessions.get_mut(&session.session_id) {
            stored.expires_at_ms = session.expires_at_ms;
            stored.last_activity_at = session.last_activity_at;
        }
        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> InquireResult<()> {
        self.lock()?.sessions.remove(&session_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> InquireResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let mut state = self.lock()?;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.expires_at_ms >= now_ms);
        let deleted = (before - state.sessions.len()) as u64;

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}
