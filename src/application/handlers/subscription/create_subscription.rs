//! CreateSubscriptionHandler - Command handler for enrolling a client.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::billing::{BillingError, Subscription};
use crate::domain::foundation::{ClientId, PlanId, SubscriptionId, TrainerId};
use crate::ports::{PlanRepository, SubscriptionRepository};

/// Command to enroll a client in a payment plan.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionCommand {
    pub trainer_id: TrainerId,
    pub client_id: ClientId,
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Handler for creating subscriptions.
///
/// The plan must exist, belong to the trainer, and be active. The plan
/// reference is fixed at creation; switching plans means a new
/// subscription.
pub struct CreateSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    plans: Arc<dyn PlanRepository>,
}

impl CreateSubscriptionHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        plans: Arc<dyn PlanRepository>,
    ) -> Self {
        Self {
            subscriptions,
            plans,
        }
    }

    pub async fn handle(
        &self,
        command: CreateSubscriptionCommand,
    ) -> Result<Subscription, BillingError> {
        let plan = self
            .plans
            .find_by_id(&command.plan_id)
            .await?
            .filter(|p| p.is_owned_by(&command.trainer_id))
            .ok_or_else(|| BillingError::plan_not_found(command.plan_id))?;

        if !plan.active {
            return Err(BillingError::plan_inactive(plan.id));
        }

        let subscription = Subscription::new(
            SubscriptionId::new(),
            plan.id,
            command.client_id,
            command.start_date,
            command.end_date,
            command.notes,
        )?;

        self.subscriptions.save(&subscription).await?;

        tracing::info!(
            subscription_id = %subscription.id,
            plan_id = %plan.id,
            client_id = %subscription.client_id,
            "subscription created"
        );
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryPlanRepository, InMemorySubscriptionRepository};
    use crate::domain::billing::PaymentPlan;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        plans: Arc<InMemoryPlanRepository>,
        subscriptions: Arc<InMemorySubscriptionRepository>,
        trainer_id: TrainerId,
        plan: PaymentPlan,
    }

    async fn fixture() -> Fixture {
        let plans = Arc::new(InMemoryPlanRepository::new());
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new(plans.clone()));
        let trainer_id = TrainerId::new();
        let plan = PaymentPlan::new(
            PlanId::new(),
            trainer_id,
            "Monthly".to_string(),
            None,
            5000,
            30,
        )
        .unwrap();
        plans.save(&plan).await.unwrap();
        Fixture {
            plans,
            subscriptions,
            trainer_id,
            plan,
        }
    }

    fn command(f: &Fixture) -> CreateSubscriptionCommand {
        CreateSubscriptionCommand {
            trainer_id: f.trainer_id,
            client_id: ClientId::new(),
            plan_id: f.plan.id,
            start_date: date(2024, 1, 1),
            end_date: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn enrolls_client_in_active_plan() {
        let f = fixture().await;
        let handler =
            CreateSubscriptionHandler::new(f.subscriptions.clone(), f.plans.clone());

        let subscription = handler.handle(command(&f)).await.unwrap();

        assert!(subscription.active);
        assert_eq!(subscription.plan_id, f.plan.id);
        assert!(f
            .subscriptions
            .find_by_id(&subscription.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn rejects_inactive_plan() {
        let f = fixture().await;
        let mut retired = f.plan.clone();
        retired.toggle_active();
        f.plans.update(&retired).await.unwrap();

        let handler =
            CreateSubscriptionHandler::new(f.subscriptions.clone(), f.plans.clone());
        let result = handler.handle(command(&f)).await;

        assert!(matches!(result, Err(BillingError::PlanInactive(_))));
    }

    #[tokio::test]
    async fn foreign_plan_reads_as_not_found() {
        let f = fixture().await;
        let handler =
            CreateSubscriptionHandler::new(f.subscriptions.clone(), f.plans.clone());

        let mut cmd = command(&f);
        cmd.trainer_id = TrainerId::new();
        let result = handler.handle(cmd).await;

        assert!(matches!(result, Err(BillingError::PlanNotFound(_))));
    }

    #[tokio::test]
    async fn rejects_end_before_start() {
        let f = fixture().await;
        let handler =
            CreateSubscriptionHandler::new(f.subscriptions.clone(), f.plans.clone());

        let mut cmd = command(&f);
        cmd.start_date = date(2024, 6, 1);
        cmd.end_date = Some(date(2024, 5, 1));
        let result = handler.handle(cmd).await;

        assert!(matches!(
            result,
            Err(BillingError::ValidationFailed { .. })
        ));
    }
}
