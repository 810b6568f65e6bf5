//! HTTP adapter for billing endpoints.
//!
//! Exposes the billing domain via REST API:
//! - `/api/plans` - payment plan catalog
//! - `/api/subscriptions` - client subscriptions and their payments
//! - `/api/payments` - payment lifecycle (settle, cancel, edit, sweep)
//! - `/api/stats` - dashboard statistics
//!
//! Trainer identity comes from the `X-Trainer-Id` header until real
//! auth middleware lands.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{AuthenticatedTrainer, BillingApiError, BillingAppState};
pub use routes::billing_routes;
