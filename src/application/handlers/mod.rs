//! Application command and query handlers.
//!
//! One handler per operation, each taking its dependencies as `Arc`ed
//! ports so adapters stay swappable.

pub mod payment;
pub mod plan;
pub mod subscription;
