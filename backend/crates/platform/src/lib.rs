//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, Base64, signed tokens)
//! - Password hashing (Argon2id)
//! - Cookie management
//! - Geodesy (great-circle distance, bounding boxes)
//! - Outbound mail transports

pub mod cookie;
pub mod crypto;
pub mod geo;
pub mod mail;
pub mod password;
