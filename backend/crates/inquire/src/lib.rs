//! Inquire Backend Module
//!
//! Location-based questions and answers.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases, configuration, notifications
//! - `infra/` - PostgreSQL and in-memory stores
//! - `presentation/` - HTTP handlers, DTOs, request validation, router
//!
//! ## Features
//! - Email + password accounts with karma
//! - Questions pinned to a latitude/longitude, searched by distance
//! - Answers, of which the question's owner accepts at most one
//! - Mail notifications for new and accepted answers
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optionally peppered
//! - Server-side sessions referenced by an HMAC-signed cookie
//! - Accepting an answer is a single atomic write

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::InquireConfig;
pub use error::{InquireError, InquireResult};
pub use infra::{memory::InMemoryRepository, postgres::PgInquireRepository};
pub use presentation::router::inquire_router;

pub use kernel::envelope::Envelope;
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::domain::repository::InquireStore;
    pub use crate::infra::memory::InMemoryRepository as MemoryStore;
    pub use crate::infra::postgres::PgInquireRepository as PgStore;
}
