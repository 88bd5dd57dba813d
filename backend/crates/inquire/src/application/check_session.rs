//! Check Session Use Case
//!
//! Resolves a session cookie to a live session.

use std::sync::Arc;

use platform::crypto;
use uuid::Uuid;

use crate::application::config::InquireConfig;
use crate::domain::entity::session::Session;
use crate::domain::repository::SessionRepository;
use crate::error::{InquireError, InquireResult};

/// Verify the token signature and extract the session id
pub(crate) fn parse_session_token(config: &InquireConfig, token: &str) -> Option<Uuid> {
    let payload = crypto::verify_token(&config.session_secret, token)?;
    payload.parse().ok()
}

/// Signed cookie value for a session
pub(crate) fn issue_session_token(config: &InquireConfig, session: &Session) -> String {
    crypto::sign_token(&config.session_secret, &session.session_id.to_string())
}

pub struct CheckSessionUseCase<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    session_repo: Arc<S>,
    config: Arc<InquireConfig>,
}

impl<S> CheckSessionUseCase<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    pub fn new(session_repo: Arc<S>, config: Arc<InquireConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Any failure (bad signature, unknown, expired) is `Unauthorized`.
    pub async fn get_session(&self, session_token: &str) -> InquireResult<Session> {
        let session_id =
            parse_session_token(&self.config, session_token).ok_or(InquireError::Unauthorized)?;

        let mut session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(InquireError::Unauthorized)?;

        if session.is_expired() {
            self.session_repo.delete(session_id).await?;
            return Err(InquireError::Unauthorized);
        }

        session.touch();

        let session_clone = session.clone();
        let repo = self.session_repo.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.update(&session_clone).await {
                tracing::warn!(error = %e, "Failed to update session activity");
            }
        });

        Ok(session)
    }
}
