//! CreatePlanHandler - Command handler for creating a payment plan.

use std::sync::Arc;

use crate::domain::billing::{BillingError, PaymentPlan};
use crate::domain::foundation::{PlanId, TrainerId};
use crate::ports::PlanRepository;

/// Command to create a new payment plan.
#[derive(Debug, Clone)]
pub struct CreatePlanCommand {
    pub trainer_id: TrainerId,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub billing_interval_days: i32,
}

/// Handler for creating payment plans.
pub struct CreatePlanHandler {
    plans: Arc<dyn PlanRepository>,
}

impl CreatePlanHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }

    /// Validates the pricing terms and persists a new active plan.
    pub async fn handle(&self, command: CreatePlanCommand) -> Result<PaymentPlan, BillingError> {
        let plan = PaymentPlan::new(
            PlanId::new(),
            command.trainer_id,
            command.name,
            command.description,
            command.price_cents,
            command.billing_interval_days,
        )?;

        self.plans.save(&plan).await?;

        tracing::info!(
            plan_id = %plan.id,
            trainer_id = %plan.owner_id,
            "payment plan created"
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPlanRepository;

    fn handler() -> (Arc<InMemoryPlanRepository>, CreatePlanHandler) {
        let repo = Arc::new(InMemoryPlanRepository::new());
        (repo.clone(), CreatePlanHandler::new(repo))
    }

    #[tokio::test]
    async fn creates_and_persists_an_active_plan() {
        let (repo, handler) = handler();
        let trainer_id = TrainerId::new();

        let plan = handler
            .handle(CreatePlanCommand {
                trainer_id,
                name: "Monthly coaching".to_string(),
                description: None,
                price_cents: 5000,
                billing_interval_days: 30,
            })
            .await
            .unwrap();

        assert!(plan.active);
        let stored = repo.find_by_id(&plan.id).await.unwrap();
        assert_eq!(stored, Some(plan));
    }

    #[tokio::test]
    async fn rejects_non_positive_price_before_any_write() {
        let (repo, handler) = handler();
        let trainer_id = TrainerId::new();

        let result = handler
            .handle(CreatePlanCommand {
                trainer_id,
                name: "Free plan".to_string(),
                description: None,
                price_cents: 0,
                billing_interval_days: 30,
            })
            .await;

        assert!(matches!(
            result,
            Err(BillingError::ValidationFailed { .. })
        ));
        assert!(repo.list_by_owner(&trainer_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_non_positive_interval() {
        let (_, handler) = handler();

        let result = handler
            .handle(CreatePlanCommand {
                trainer_id: TrainerId::new(),
                name: "Plan".to_string(),
                description: None,
                price_cents: 5000,
                billing_interval_days: -1,
            })
            .await;

        assert!(result.is_err());
    }
}
