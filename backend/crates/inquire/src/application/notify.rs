//! Answer notifications
//!
//! Mail goes out after the triggering write has been stored. Delivery is
//! best-effort: failures are logged and never fail the request.

use std::sync::Arc;

use platform::mail::{MailTransport, OutgoingMail};

use crate::domain::entity::{answer::Answer, question::Question, user::User};

pub const NEW_ANSWER_SUBJECT: &str = "Your question has a new answer!";
pub const ACCEPTED_SUBJECT: &str = "Your answer was accepted!";

pub struct Notifier<M>
where
    M: MailTransport,
{
    mailer: Arc<M>,
}

impl<M> Notifier<M>
where
    M: MailTransport,
{
    pub fn new(mailer: Arc<M>) -> Self {
        Self { mailer }
    }

    /// Tell the question's owner about a new answer
    pub async fn answer_received(&self, owner: &User, question: &Question, answer: &Answer) {
        let body = format!(
            "This is to inform you that one of your questions has received a new answer.\n\n\
             Your question:\n{}\n\n\
             The answer:\n{}\n\n\
             Regards,\n\nInquire Application\n",
            question.question, answer.answer
        );

        self.deliver(OutgoingMail::new(owner.email.as_str(), NEW_ANSWER_SUBJECT, body))
            .await;
    }

    /// Tell the answer's author it was accepted
    pub async fn answer_accepted(&self, author: &User, question: &Question, answer: &Answer) {
        let body = format!(
            "This is to inform you that one of your answers has been accepted! \
             You have been given one karma point.\n\n\
             The question you answered:\n{}\n\n\
             Your answer:\n{}\n\n\
             Regards,\n\nInquire Application\n",
            question.question, answer.answer
        );

        self.deliver(OutgoingMail::new(author.email.as_str(), ACCEPTED_SUBJECT, body))
            .await;
    }

    async fn deliver(&self, mail: OutgoingMail) {
        if let Err(e) = self.mailer.send(&mail).await {
            tracing::warn!(
                error = %e,
                to = %mail.to,
                subject = %mail.subject,
                "Notification delivery failed"
            );
        }
    }
}
