//! Adapters - Implementations of the ports.
//!
//! - `postgres` - production persistence via sqlx
//! - `memory` - in-process implementations for tests and local dev
//! - `http` - axum REST surface

pub mod http;
pub mod memory;
pub mod postgres;
