//! List Answers Use Case

use std::sync::Arc;

use crate::domain::entity::answer::Answer;
use crate::domain::repository::{AnswerRepository, QuestionRepository};
use crate::domain::value_object::question_id::QuestionId;
use crate::error::{InquireError, InquireResult};

pub struct ListAnswersUseCase<Q, A>
where
    Q: QuestionRepository,
    A: AnswerRepository,
{
    question_repo: Arc<Q>,
    answer_repo: Arc<A>,
}

impl<Q, A> ListAnswersUseCase<Q, A>
where
    Q: QuestionRepository,
    A: AnswerRepository,
{
    pub fn new(question_repo: Arc<Q>, answer_repo: Arc<A>) -> Self {
        Self {
            question_repo,
            answer_repo,
        }
    }

    /// Every answer of the question, oldest first
    pub async fn execute(&self, question_id: &QuestionId) -> InquireResult<Vec<Answer>> {
        let question = self
            .question_repo
            .find_by_id(question_id)
            .await?
            .ok_or(InquireError::AnswersQuestionNotFound)?;

        self.answer_repo.find_by_question(&question.question_id).await
    }
}
