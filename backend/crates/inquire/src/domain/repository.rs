//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.

use platform::geo::GeoPoint;
use uuid::Uuid;

use crate::domain::entity::{answer::Answer, question::Question, session::Session, user::User};
use crate::domain::value_object::{
    answer_id::AnswerId, email::Email, question_id::QuestionId, user_id::UserId,
};
use crate::error::InquireResult;

#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Fails with `EmailTaken` if the store already holds the email.
    async fn create(&self, user: &User) -> InquireResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> InquireResult<Option<User>>;

    /// Every account stored under `email`; more than one is an integrity fault.
    async fn find_by_email(&self, email: &Email) -> InquireResult<Vec<User>>;

    async fn exists_by_email(&self, email: &Email) -> InquireResult<bool>;

    async fn update(&self, user: &User) -> InquireResult<()>;
}

#[trait_variant::make(QuestionRepository: Send)]
pub trait LocalQuestionRepository {
    async fn create(&self, question: &Question) -> InquireResult<()>;

    async fn find_by_id(&self, question_id: &QuestionId) -> InquireResult<Option<Question>>;

    async fn update(&self, question: &Question) -> InquireResult<()>;

    /// Open questions within `max_distance_km` of `center`, nearest first,
    /// at most `max_results` of them.
    async fn find_nearby(
        &self,
        center: &GeoPoint,
        max_results: u32,
        max_distance_km: f64,
    ) -> InquireResult<Vec<Question>>;
}

#[trait_variant::make(AnswerRepository: Send)]
pub trait LocalAnswerRepository {
    /// Inserts only while the question is open.
    ///
    /// Fails with `QuestionNotFound` or `QuestionClosed`.
    async fn create(&self, answer: &Answer) -> InquireResult<()>;

    async fn find_by_id(&self, answer_id: &AnswerId) -> InquireResult<Option<Answer>>;

    /// Oldest first
    async fn find_by_question(&self, question_id: &QuestionId) -> InquireResult<Vec<Answer>>;

    async fn update(&self, answer: &Answer) -> InquireResult<()>;

    /// Atomically close the answer's question, mark the answer accepted and
    /// award its author one karma point.
    ///
    /// Fails with `AlreadyAccepted` and writes nothing when the question is
    /// already closed.
    async fn accept(&self, answer: &Answer) -> InquireResult<()>;
}

#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn create(&self, session: &Session) -> InquireResult<()>;

    /// Session by id, whether or not it has expired
    async fn find_by_id(&self, session_id: Uuid) -> InquireResult<Option<Session>>;

    /// Persist last activity
    async fn update(&self, session: &Session) -> InquireResult<()>;

    async fn delete(&self, session_id: Uuid) -> InquireResult<()>;

    async fn cleanup_expired(&self) -> InquireResult<u64>;
}

/// Everything the HTTP layer needs from one store
pub trait InquireStore:
    UserRepository
    + QuestionRepository
    + AnswerRepository
    + SessionRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> InquireStore for T where
    T: UserRepository
        + QuestionRepository
        + AnswerRepository
        + SessionRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
