//! UpdatePlanHandler - Command handler for partial plan updates.

use std::sync::Arc;

use crate::domain::billing::{BillingError, PaymentPlan, PlanUpdate};
use crate::domain::foundation::{PlanId, TrainerId};
use crate::ports::PlanRepository;

/// Command to update a payment plan.
///
/// `None` fields are left unchanged. Ownership is checked before any
/// change: a plan owned by another trainer reads as not found.
#[derive(Debug, Clone, Default)]
pub struct UpdatePlanCommand {
    pub trainer_id: TrainerId,
    pub plan_id: PlanId,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price_cents: Option<i64>,
    pub billing_interval_days: Option<i32>,
}

/// Handler for updating payment plans.
pub struct UpdatePlanHandler {
    plans: Arc<dyn PlanRepository>,
}

impl UpdatePlanHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }

    pub async fn handle(&self, command: UpdatePlanCommand) -> Result<PaymentPlan, BillingError> {
        let mut plan = self
            .plans
            .find_by_id(&command.plan_id)
            .await?
            .filter(|p| p.is_owned_by(&command.trainer_id))
            .ok_or_else(|| BillingError::plan_not_found(command.plan_id))?;

        let price = match command.price_cents {
            Some(cents) => Some(
                crate::domain::foundation::Money::positive_from_cents(cents)
                    .map_err(BillingError::from)?,
            ),
            None => None,
        };

        plan.apply_update(PlanUpdate {
            name: command.name,
            description: command.description,
            price,
            billing_interval_days: command.billing_interval_days,
        })?;

        self.plans.update(&plan).await?;

        tracing::info!(plan_id = %plan.id, "payment plan updated");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPlanRepository;

    async fn seeded() -> (Arc<InMemoryPlanRepository>, TrainerId, PaymentPlan) {
        let repo = Arc::new(InMemoryPlanRepository::new());
        let trainer_id = TrainerId::new();
        let plan = PaymentPlan::new(
            PlanId::new(),
            trainer_id,
            "Monthly coaching".to_string(),
            None,
            5000,
            30,
        )
        .unwrap();
        repo.save(&plan).await.unwrap();
        (repo, trainer_id, plan)
    }

    #[tokio::test]
    async fn updates_supplied_fields_only() {
        let (repo, trainer_id, plan) = seeded().await;
        let handler = UpdatePlanHandler::new(repo.clone());

        let updated = handler
            .handle(UpdatePlanCommand {
                trainer_id,
                plan_id: plan.id,
                price_cents: Some(7500),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.price.as_cents(), 7500);
        assert_eq!(updated.name, "Monthly coaching");
        assert_eq!(repo.find_by_id(&plan.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn foreign_plan_reads_as_not_found() {
        let (repo, _, plan) = seeded().await;
        let handler = UpdatePlanHandler::new(repo);

        let result = handler
            .handle(UpdatePlanCommand {
                trainer_id: TrainerId::new(),
                plan_id: plan.id,
                name: Some("Hijacked".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(BillingError::PlanNotFound(_))));
    }

    #[tokio::test]
    async fn rejects_non_positive_price() {
        let (repo, trainer_id, plan) = seeded().await;
        let handler = UpdatePlanHandler::new(repo.clone());

        let result = handler
            .handle(UpdatePlanCommand {
                trainer_id,
                plan_id: plan.id,
                price_cents: Some(-100),
                ..Default::default()
            })
            .await;

        assert!(result.is_err());
        // Stored plan untouched.
        let stored = repo.find_by_id(&plan.id).await.unwrap().unwrap();
        assert_eq!(stored.price.as_cents(), 5000);
    }

    #[tokio::test]
    async fn missing_plan_is_not_found() {
        let (repo, trainer_id, _) = seeded().await;
        let handler = UpdatePlanHandler::new(repo);

        let result = handler
            .handle(UpdatePlanCommand {
                trainer_id,
                plan_id: PlanId::new(),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(BillingError::PlanNotFound(_))));
    }
}
