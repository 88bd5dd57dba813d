//! Session Gate
//!
//! Middleware for requiring a live session on protected routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::CheckSessionUseCase;
use crate::application::config::InquireConfig;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::InquireError;

/// Middleware state
#[derive(Clone)]
pub struct SessionGateState<R>
where
    R: SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<InquireConfig>,
}

/// Caller resolved from the session cookie
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub session_id: Uuid,
}

/// Reject the request with a 401 envelope unless it carries a live session
pub async fn require_session<R>(
    State(state): State<SessionGateState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: SessionRepository + Clone + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name)
        .ok_or_else(|| InquireError::Unauthorized.into_response())?;

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());

    let session = match use_case.get_session(&token).await {
        Ok(session) => session,
        // Infrastructure failures keep their own status.
        Err(e @ (InquireError::Database(_) | InquireError::Internal(_))) => {
            return Err(e.into_response());
        }
        Err(_) => return Err(InquireError::Unauthorized.into_response()),
    };

    req.extensions_mut().insert(CurrentUser {
        user_id: session.user_id,
        session_id: session.session_id,
    });

    Ok(next.run(req).await)
}
