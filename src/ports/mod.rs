//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Write-side Ports
//!
//! - `PlanRepository` - PaymentPlan aggregate persistence
//! - `SubscriptionRepository` - Subscription aggregate persistence
//! - `PaymentRepository` - Payment persistence, batch insert, overdue updates
//!
//! ## Read-side Ports
//!
//! - `BillingReader` - Dashboard statistics queries
//!
//! ## Collaborator Ports
//!
//! - `ClientDirectory` - Read-only client contact lookup

mod billing_reader;
mod client_directory;
mod payment_repository;
mod plan_repository;
mod subscription_repository;

pub use billing_reader::BillingReader;
pub use client_directory::{ClientContact, ClientDirectory};
pub use payment_repository::PaymentRepository;
pub use plan_repository::PlanRepository;
pub use subscription_repository::SubscriptionRepository;
