//! Payment plan repository port (write side).

use crate::domain::billing::PaymentPlan;
use crate::domain::foundation::{DomainError, PlanId, TrainerId};
use async_trait::async_trait;

/// Repository port for PaymentPlan aggregate persistence.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Save a new plan.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, plan: &PaymentPlan) -> Result<(), DomainError>;

    /// Update an existing plan.
    ///
    /// # Errors
    ///
    /// - `PlanNotFound` if the plan does not exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, plan: &PaymentPlan) -> Result<(), DomainError>;

    /// Find a plan by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &PlanId) -> Result<Option<PaymentPlan>, DomainError>;

    /// List all plans owned by a trainer, newest first.
    async fn list_by_owner(&self, owner_id: &TrainerId) -> Result<Vec<PaymentPlan>, DomainError>;
}
