//! Payment repository port (write side).

use crate::domain::billing::Payment;
use crate::domain::foundation::{DomainError, PaymentId, SubscriptionId};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Repository port for Payment aggregate persistence.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Save a single payment.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, payment: &Payment) -> Result<(), DomainError>;

    /// Save a batch of payments atomically: all rows or none.
    ///
    /// Used by schedule generation so a failure mid-batch cannot leave
    /// a partial schedule behind.
    async fn save_batch(&self, payments: &[Payment]) -> Result<(), DomainError>;

    /// Update an existing payment.
    ///
    /// # Errors
    ///
    /// - `PaymentNotFound` if the payment does not exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, payment: &Payment) -> Result<(), DomainError>;

    /// Find a payment by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError>;

    /// List a subscription's payments ascending by scheduled date.
    async fn list_by_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Vec<Payment>, DomainError>;

    /// Count payments belonging to a subscription.
    ///
    /// Guards subscription deletion.
    async fn count_by_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<i64, DomainError>;

    /// Latest scheduled date among a subscription's payments.
    ///
    /// Returns `None` when the subscription has no payments. Anchors
    /// schedule generation.
    async fn latest_scheduled(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Option<NaiveDate>, DomainError>;

    /// List pending payments in the given scope that fell due before `today`.
    ///
    /// Candidates for the overdue sweep.
    async fn list_pending_due_before(
        &self,
        subscription_ids: &[SubscriptionId],
        today: NaiveDate,
    ) -> Result<Vec<Payment>, DomainError>;

    /// Conditionally move one payment to overdue.
    ///
    /// The update only applies while the row is still pending, so
    /// concurrent sweeps converge. Returns `true` if the row changed.
    async fn mark_overdue_if_pending(&self, id: &PaymentId) -> Result<bool, DomainError>;

    /// Delete a payment.
    ///
    /// # Errors
    ///
    /// - `PaymentNotFound` if the payment does not exist
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: &PaymentId) -> Result<(), DomainError>;
}
