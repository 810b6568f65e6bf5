//! PostgreSQL adapters.
//!
//! sqlx-backed implementations of the persistence and read-side ports.

mod billing_reader;
mod client_directory;
mod payment_repository;
mod plan_repository;
mod subscription_repository;

pub use billing_reader::PostgresBillingReader;
pub use client_directory::PostgresClientDirectory;
pub use payment_repository::PostgresPaymentRepository;
pub use plan_repository::PostgresPlanRepository;
pub use subscription_repository::PostgresSubscriptionRepository;
