//! Billing reader port (read side / CQRS queries).
//!
//! Read-optimized statistics over a payment scope. The scope is a set
//! of subscription ids the caller already resolved (one subscription,
//! or everything under a trainer's plans), so implementations stay
//! self-contained.

use crate::domain::billing::BillingStatistics;
use crate::domain::foundation::{DomainError, SubscriptionId};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Reader port for billing dashboard queries.
#[async_trait]
pub trait BillingReader: Send + Sync {
    /// Compute dashboard statistics over the given subscriptions.
    ///
    /// Counts and lists reflect stored statuses; callers run the
    /// overdue sweep first so the numbers are current.
    async fn statistics(
        &self,
        subscription_ids: &[SubscriptionId],
        today: NaiveDate,
    ) -> Result<BillingStatistics, DomainError>;
}
