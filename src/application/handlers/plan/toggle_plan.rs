//! TogglePlanHandler - Command handler for retiring/reactivating a plan.

use std::sync::Arc;

use crate::domain::billing::{BillingError, PaymentPlan};
use crate::domain::foundation::{PlanId, TrainerId};
use crate::ports::PlanRepository;

/// Command to flip a plan's active flag.
#[derive(Debug, Clone)]
pub struct TogglePlanCommand {
    pub trainer_id: TrainerId,
    pub plan_id: PlanId,
}

/// Handler for toggling plan availability.
///
/// Retiring a plan stops new subscriptions only; existing
/// subscriptions and their payments are untouched.
pub struct TogglePlanHandler {
    plans: Arc<dyn PlanRepository>,
}

impl TogglePlanHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }

    pub async fn handle(&self, command: TogglePlanCommand) -> Result<PaymentPlan, BillingError> {
        let mut plan = self
            .plans
            .find_by_id(&command.plan_id)
            .await?
            .filter(|p| p.is_owned_by(&command.trainer_id))
            .ok_or_else(|| BillingError::plan_not_found(command.plan_id))?;

        plan.toggle_active();
        self.plans.update(&plan).await?;

        tracing::info!(plan_id = %plan.id, active = plan.active, "payment plan toggled");
        Ok(plan)
    }
}
