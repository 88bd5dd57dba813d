//! Accept Answer Use Case
//!
//! The question's owner accepts one answer: the question closes, the answer
//! is marked accepted and its author earns a karma point, all or nothing.

use std::sync::Arc;

use platform::mail::MailTransport;

use crate::application::notify::Notifier;
use crate::domain::repository::{AnswerRepository, QuestionRepository, UserRepository};
use crate::domain::value_object::{answer_id::AnswerId, user_id::UserId};
use crate::error::{InquireError, InquireResult};

pub struct AcceptAnswerUseCase<A, Q, U, M>
where
    A: AnswerRepository,
    Q: QuestionRepository,
    U: UserRepository,
    M: MailTransport,
{
    answer_repo: Arc<A>,
    question_repo: Arc<Q>,
    user_repo: Arc<U>,
    notifier: Notifier<M>,
}

impl<A, Q, U, M> AcceptAnswerUseCase<A, Q, U, M>
where
    A: AnswerRepository,
    Q: QuestionRepository,
    U: UserRepository,
    M: MailTransport,
{
    pub fn new(answer_repo: Arc<A>, question_repo: Arc<Q>, user_repo: Arc<U>, mailer: Arc<M>) -> Self {
        Self {
            answer_repo,
            question_repo,
            user_repo,
            notifier: Notifier::new(mailer),
        }
    }

    pub async fn execute(&self, user_id: &UserId, answer_id: &AnswerId) -> InquireResult<()> {
        let mut answer = self
            .answer_repo
            .find_by_id(answer_id)
            .await?
            .ok_or(InquireError::AnswerNotFound)?;

        let mut question = self
            .question_repo
            .find_by_id(&answer.question_id)
            .await?
            .ok_or(InquireError::QuestionNotFound)?;

        if !question.is_owned_by(user_id) {
            return Err(InquireError::NotQuestionOwner);
        }

        if question.closed {
            return Err(InquireError::AlreadyAccepted);
        }

        // Loses cleanly to a concurrent accept with AlreadyAccepted.
        self.answer_repo.accept(&answer).await?;

        answer.accepted = true;
        question.close();

        tracing::info!(
            answer_id = %answer.answer_id,
            question_id = %question.question_id,
            author_id = %answer.user_id,
            "Answer accepted"
        );

        match self.user_repo.find_by_id(&answer.user_id).await {
            Ok(Some(author)) => {
                self.notifier
                    .answer_accepted(&author, &question, &answer)
                    .await
            }
            Ok(None) => tracing::warn!(
                answer_id = %answer.answer_id,
                "Answer author missing, notification skipped"
            ),
            Err(e) => tracing::warn!(error = %e, "Author lookup failed, notification skipped"),
        }

        Ok(())
    }
}
