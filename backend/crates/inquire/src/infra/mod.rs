//! Infrastructure Layer
//!
//! Repository implementations: PostgreSQL for deployments, in-memory for
//! tests and local runs.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PgInquireRepository;
