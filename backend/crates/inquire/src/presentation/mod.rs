//! Presentation Layer
//!
//! HTTP handlers, DTOs, request validation, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod router;

pub use handlers::InquireAppState;
pub use middleware::{CurrentUser, SessionGateState, require_session};
pub use request::{ApiRequest, Endpoint};
pub use router::inquire_router;
