//! Ask Question Use Case

use std::sync::Arc;

use platform::geo::GeoPoint;

use crate::domain::entity::{question::Question, user::User};
use crate::domain::repository::{QuestionRepository, UserRepository};
use crate::domain::value_object::{post_text::PostText, user_id::UserId};
use crate::error::{InquireError, InquireResult};

pub struct AskInput {
    pub question: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Accepted and ignored; payments are not verified.
    pub pay_key: String,
}

#[derive(Debug)]
pub struct AskOutput {
    pub question: Question,
    pub user: User,
}

pub struct AskQuestionUseCase<Q, U>
where
    Q: QuestionRepository,
    U: UserRepository,
{
    question_repo: Arc<Q>,
    user_repo: Arc<U>,
}

impl<Q, U> AskQuestionUseCase<Q, U>
where
    Q: QuestionRepository,
    U: UserRepository,
{
    pub fn new(question_repo: Arc<Q>, user_repo: Arc<U>) -> Self {
        Self {
            question_repo,
            user_repo,
        }
    }

    pub async fn execute(&self, user_id: &UserId, input: AskInput) -> InquireResult<AskOutput> {
        let text = PostText::new("question", input.question)?;
        let location = GeoPoint::new(input.latitude, input.longitude)
            .map_err(|e| InquireError::InvalidInput(e.to_string()))?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(InquireError::Unauthorized)?;

        tracing::debug!(pay_key_len = input.pay_key.len(), "pay_key accepted without verification");

        let question = Question::new(user.user_id, text, location);
        self.question_repo.create(&question).await?;

        tracing::info!(
            question_id = %question.question_id,
            user_id = %user.user_id,
            "Question asked"
        );

        Ok(AskOutput { question, user })
    }
}
