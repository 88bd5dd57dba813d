//! Application Layer
//!
//! Use cases and application services.

pub mod accept_answer;
pub mod answer_question;
pub mod ask_question;
pub mod authenticate;
pub mod check_session;
pub mod config;
pub mod list_answers;
pub mod nearby_questions;
pub mod notify;
pub mod register;
pub mod seed_questions;
pub mod sign_out;

pub use accept_answer::AcceptAnswerUseCase;
pub use answer_question::{AnswerInput, AnswerQuestionUseCase};
pub use ask_question::{AskInput, AskOutput, AskQuestionUseCase};
pub use authenticate::{AuthenticateInput, AuthenticateOutput, AuthenticateUseCase};
pub use check_session::CheckSessionUseCase;
pub use config::InquireConfig;
pub use list_answers::ListAnswersUseCase;
pub use nearby_questions::{NearbyInput, NearbyQuestionsUseCase};
pub use notify::Notifier;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use seed_questions::SeedQuestionsUseCase;
pub use sign_out::SignOutUseCase;
