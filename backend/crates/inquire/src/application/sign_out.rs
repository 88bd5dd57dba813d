//! Sign Out Use Case

use std::sync::Arc;

use crate::application::check_session::parse_session_token;
use crate::application::config::InquireConfig;
use crate::domain::repository::SessionRepository;
use crate::error::InquireResult;

pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<InquireConfig>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<InquireConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Delete the session behind `session_token`.
    ///
    /// Returns false when the token does not name a session.
    pub async fn execute(&self, session_token: &str) -> InquireResult<bool> {
        let Some(session_id) = parse_session_token(&self.config, session_token) else {
            return Ok(false);
        };

        self.session_repo.delete(session_id).await?;

        tracing::info!(session_id = %session_id, "User signed out");
        Ok(true)
    }
}
