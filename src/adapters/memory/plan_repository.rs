//! In-memory plan repository implementation.
//!
//! Useful for development environments and integration tests that do
//! not need PostgreSQL. Thread-safe via internal `Mutex`; data does not
//! survive restarts.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::billing::PaymentPlan;
use crate::domain::foundation::{DomainError, ErrorCode, PlanId, TrainerId};
use crate::ports::PlanRepository;

/// In-memory implementation of the PlanRepository port.
#[derive(Default)]
pub struct InMemoryPlanRepository {
    plans: Mutex<Vec<PaymentPlan>>,
}

impl InMemoryPlanRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn save(&self, plan: &PaymentPlan) -> Result<(), DomainError> {
        self.plans.lock().unwrap().push(plan.clone());
        Ok(())
    }

    async fn update(&self, plan: &PaymentPlan) -> Result<(), DomainError> {
        let mut plans = self.plans.lock().unwrap();
        match plans.iter_mut().find(|p| p.id == plan.id) {
            Some(existing) => {
                *existing = plan.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::PlanNotFound,
                format!("Payment plan not found: {}", plan.id),
            )
            .with_detail("id", plan.id.to_string())),
        }
    }

    async fn find_by_id(&self, id: &PlanId) -> Result<Option<PaymentPlan>, DomainError> {
        Ok(self
            .plans
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.id == id)
            .cloned())
    }

    async fn list_by_owner(
        &self,
        owner_id: &TrainerId,
    ) -> Result<Vec<PaymentPlan>, DomainError> {
        let mut plans: Vec<PaymentPlan> = self
            .plans
            .lock()
            .unwrap()
            .iter()
            .filter(|p| &p.owner_id == owner_id)
            .cloned()
            .collect();
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(plans)
    }
}
