//! HTTP adapters - REST API implementations.

pub mod billing;

// Re-export key types for convenience
pub use billing::billing_routes;
pub use billing::BillingAppState;
