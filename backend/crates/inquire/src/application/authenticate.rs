//! Authenticate Use Case
//!
//! Checks email + password and opens a session.

use std::sync::Arc;

use crate::application::check_session::issue_session_token;
use crate::application::config::InquireConfig;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{InquireError, InquireResult};

pub struct AuthenticateInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct AuthenticateOutput {
    pub user: User,
    /// Signed cookie value
    pub session_token: String,
}

pub struct AuthenticateUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<InquireConfig>,
}

impl<U, S> AuthenticateUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<InquireConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, input: AuthenticateInput) -> InquireResult<AuthenticateOutput> {
        // Malformed input is indistinguishable from a wrong password.
        let email = Email::new(&input.email).map_err(|_| InquireError::InvalidCredentials)?;
        let raw_password =
            RawPassword::new(input.password).map_err(|_| InquireError::InvalidCredentials)?;

        let candidates = self.user_repo.find_by_email(&email).await?;
        let pepper = self.config.pepper();

        let mut matching = candidates
            .iter()
            .filter(|user| user.password_hash.verify(&raw_password, pepper));

        let Some(user) = matching.next() else {
            return Err(InquireError::InvalidCredentials);
        };

        // Only reported once the caller has proven the password.
        if candidates.len() > 1 {
            tracing::error!(
                accounts = candidates.len(),
                "Email address is shared by several accounts"
            );
            return Err(InquireError::DuplicateAccount);
        }

        let user = user.clone();
        let session = Session::new(user.user_id, self.config.session_ttl_chrono());
        self.session_repo.create(&session).await?;

        let session_token = issue_session_token(&self.config, &session);

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            "User signed in"
        );

        Ok(AuthenticateOutput {
            user,
            session_token,
        })
    }
}
