//! In-memory adapters.
//!
//! Port implementations backed by process memory. Used for local
//! development and integration tests; production deployments use the
//! PostgreSQL adapters.

mod billing_reader;
mod client_directory;
mod payment_repository;
mod plan_repository;
mod subscription_repository;

pub use billing_reader::InMemoryBillingReader;
pub use client_directory::StaticClientDirectory;
pub use payment_repository::InMemoryPaymentRepository;
pub use plan_repository::InMemoryPlanRepository;
pub use subscription_repository::InMemorySubscriptionRepository;
