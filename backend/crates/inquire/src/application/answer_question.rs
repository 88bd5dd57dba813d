//! Answer Question Use Case
//!
//! Adds an answer to an open question and notifies the question's owner.

use std::sync::Arc;

use platform::mail::MailTransport;

use crate::application::notify::Notifier;
use crate::domain::entity::answer::Answer;
use crate::domain::repository::{AnswerRepository, QuestionRepository, UserRepository};
use crate::domain::value_object::{post_text::PostText, question_id::QuestionId, user_id::UserId};
use crate::error::{InquireError, InquireResult};

pub struct AnswerInput {
    pub question_id: QuestionId,
    pub answer: String,
}

pub struct AnswerQuestionUseCase<Q, A, U, M>
where
    Q: QuestionRepository,
    A: AnswerRepository,
    U: UserRepository,
    M: MailTransport,
{
    question_repo: Arc<Q>,
    answer_repo: Arc<A>,
    user_repo: Arc<U>,
    notifier: Notifier<M>,
}

impl<Q, A, U, M> AnswerQuestionUseCase<Q, A, U, M>
where
    Q: QuestionRepository,
    A: AnswerRepository,
    U: UserRepository,
    M: MailTransport,
{
    pub fn new(question_repo: Arc<Q>, answer_repo: Arc<A>, user_repo: Arc<U>, mailer: Arc<M>) -> Self {
        Self {
            question_repo,
            answer_repo,
            user_repo,
            notifier: Notifier::new(mailer),
        }
    }

    pub async fn execute(&self, user_id: &UserId, input: AnswerInput) -> InquireResult<Answer> {
        let question = self
            .question_repo
            .find_by_id(&input.question_id)
            .await?
            .ok_or(InquireError::QuestionNotFound)?;

        if question.closed {
            return Err(InquireError::QuestionClosed);
        }

        let text = PostText::new("answer", input.answer)?;
        let answer = Answer::new(question.question_id, *user_id, text);

        // Re-checks `closed` atomically with the insert.
        self.answer_repo.create(&answer).await?;

        tracing::info!(
            answer_id = %answer.answer_id,
            question_id = %question.question_id,
            user_id = %user_id,
            "Answer posted"
        );

        match self.user_repo.find_by_id(&question.user_id).await {
            Ok(Some(owner)) => {
                self.notifier
                    .answer_received(&owner, &question, &answer)
                    .await
            }
            Ok(None) => tracing::warn!(
                question_id = %question.question_id,
                "Question owner missing, notification skipped"
            ),
            Err(e) => tracing::warn!(error = %e, "Owner lookup failed, notification skipped"),
        }

        Ok(answer)
    }
}
