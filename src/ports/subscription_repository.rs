//! Subscription repository port (write side).

use crate::domain::billing::Subscription;
use crate::domain::foundation::{DomainError, SubscriptionId, TrainerId};
use async_trait::async_trait;

/// Repository port for Subscription aggregate persistence.
///
/// Trainer scope is derived through plan ownership: a subscription
/// belongs to the trainer who owns its plan.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Save a new subscription.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Update an existing subscription.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if the subscription does not exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Find a subscription by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &SubscriptionId)
        -> Result<Option<Subscription>, DomainError>;

    /// List all subscriptions under plans owned by a trainer, newest first.
    async fn list_by_trainer(
        &self,
        trainer_id: &TrainerId,
    ) -> Result<Vec<Subscription>, DomainError>;

    /// Delete a subscription.
    ///
    /// Callers must verify the subscription owns no payments first.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if the subscription does not exist
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: &SubscriptionId) -> Result<(), DomainError>;
}
