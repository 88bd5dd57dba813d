//! Outbound mail
//!
//! [`MailTransport`] is the seam the application sends through. Three
//! transports ship here:
//! - [`SmtpTransport`]: STARTTLS relay via lettre
//! - [`LogTransport`]: writes each message to the log (development)
//! - `MemoryOutbox`: keeps messages in memory (tests, `test-util` feature)

#[cfg(any(test, feature = "test-util"))]
use std::sync::{Arc, Mutex};

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use thiserror::Error;

/// A plain-text message ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingMail {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Mail rejected: {0}")]
    Rejected(String),
}

#[trait_variant::make(MailTransport: Send)]
pub trait LocalMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

// ============================================================================
// SMTP
// ============================================================================

/// SMTP relay settings
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// `From:` address, e.g. `Inquire <noreply@example.com>`
    pub sender: String,
}

#[derive(Clone)]
pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpTransport {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let sender: Mailbox = config
            .sender
            .parse()
            .map_err(|_| MailError::InvalidAddress(config.sender.clone()))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
            sender,
        })
    }
}

impl MailTransport for SmtpTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|_| MailError::InvalidAddress(mail.to.clone()))?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())?;

        self.mailer.send(message).await?;

        tracing::info!(to = %mail.to, subject = %mail.subject, "Email sent");
        Ok(())
    }
}

// ============================================================================
// Log
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

impl MailTransport for LogTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            body = %mail.body,
            "Email not sent (no SMTP relay configured)"
        );
        Ok(())
    }
}

// ============================================================================
// Memory
// ============================================================================

#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
struct OutboxState {
    sent: Vec<OutgoingMail>,
    fail_with: Option<String>,
}

/// Collects messages instead of delivering them
///
/// Clones share the same outbox.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone, Default)]
pub struct MemoryOutbox {
    state: Arc<Mutex<OutboxState>>,
}

#[cfg(any(test, feature = "test-util"))]
impl MemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// An outbox whose every send fails with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        let outbox = Self::default();
        if let Ok(mut state) = outbox.state.lock() {
            state.fail_with = Some(reason.into());
        }
        outbox
    }

    /// Messages accepted so far, oldest first
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.state
            .lock()
            .map(|state| state.sent.clone())
            .unwrap_or_default()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl MailTransport for MemoryOutbox {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| MailError::Rejected("outbox lock poisoned".to_string()))?;

        if let Some(reason) = &state.fail_with {
            return Err(MailError::Rejected(reason.clone()));
        }

        state.sent.push(mail.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_outbox_collects() {
        let outbox = MemoryOutbox::new();
        let view = outbox.clone();

        MailTransport::send(&outbox, &OutgoingMail::new("a@example.com", "Hi", "Body"))
            .await
            .unwrap();

        let sent = view.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@example.com");
        assert_eq!(sent[0].subject, "Hi");
    }

    #[tokio::test]
    async fn test_failing_outbox() {
        let outbox = MemoryOutbox::failing("relay down");
        let err = MailTransport::send(&outbox, &OutgoingMail::new("a@example.com", "Hi", "Body"))
            .await
            .unwrap_err();

        assert!(matches!(err, MailError::Rejected(reason) if reason == "relay down"));
        assert!(outbox.sent().is_empty());
    }

    #[tokio::test]
    async fn test_log_transport_accepts_everything() {
        let result =
            MailTransport::send(&LogTransport, &OutgoingMail::new("anyone", "Subject", "Body"))
                .await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_smtp_rejects_bad_sender() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: None,
            password: None,
            sender: "not an address".to_string(),
        };
        assert!(matches!(
            SmtpTransport::new(&config),
            Err(MailError::InvalidAddress(_))
        ));
    }
}
