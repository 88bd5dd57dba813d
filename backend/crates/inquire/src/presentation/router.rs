//! Inquire Router
//!
//! Every route accepts any method so that the handlers, not the router,
//! report a wrong method in the response envelope.

use axum::{Router, middleware, routing::any};
use platform::mail::MailTransport;
use std::sync::Arc;

use crate::application::config::InquireConfig;
use crate::domain::repository::InquireStore;
use crate::presentation::handlers::{self, InquireAppState};
use crate::presentation::middleware::{SessionGateState, require_session};

/// Create the API router for any store and mail transport
pub fn inquire_router<R, M>(repo: R, mailer: M, config: InquireConfig) -> Router
where
    R: InquireStore,
    M: MailTransport + Sync + 'static,
{
    let seed_endpoint_enabled = config.seed_endpoint_enabled;

    let state = InquireAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        config: Arc::new(config),
    };

    let gate = SessionGateState {
        repo: state.repo.clone(),
        config: state.config.clone(),
    };

    let protected = Router::new()
        .route("/ask", any(handlers::ask::<R, M>))
        .route("/answer", any(handlers::answer::<R, M>))
        .route("/accept", any(handlers::accept::<R, M>))
        .route("/answers", any(handlers::answers::<R, M>))
        .route("/questions", any(handlers::questions::<R, M>))
        .route_layer(middleware::from_fn_with_state(gate, require_session::<R>));

    let mut public = Router::new()
        .route("/register", any(handlers::register::<R, M>))
        .route("/auth", any(handlers::auth::<R, M>))
        .route("/logout", any(handlers::logout::<R, M>));

    if seed_endpoint_enabled {
        tracing::warn!("Debug seeding endpoint /randomize is enabled");
        public = public.route("/randomize", any(handlers::randomize::<R, M>));
    }

    public.merge(protected).with_state(state)
}
