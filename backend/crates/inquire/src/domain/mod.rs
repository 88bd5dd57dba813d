//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::{answer::Answer, question::Question, session::Session, user::User};
pub use repository::{
    AnswerRepository, InquireStore, QuestionRepository, SessionRepository, UserRepository,
};
