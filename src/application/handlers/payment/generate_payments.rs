//! GeneratePaymentsHandler - Command handler for batch schedule generation.

use std::sync::Arc;

use crate::domain::billing::{next_scheduled_dates, BillingError, Payment};
use crate::domain::foundation::{PaymentId, SubscriptionId};
use crate::ports::{PaymentRepository, PlanRepository, SubscriptionRepository};

/// Command to generate the next `count` scheduled payments.
#[derive(Debug, Clone)]
pub struct GeneratePaymentsCommand {
    pub subscription_id: SubscriptionId,
    pub count: u32,
}

/// Handler for payment schedule generation.
///
/// New payments continue from the latest scheduled date when the
/// subscription already has payments, otherwise the first one lands on
/// the subscription start date. Each row snapshots the plan price. The
/// batch is inserted atomically: all rows or none.
pub struct GeneratePaymentsHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    plans: Arc<dyn PlanRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl GeneratePaymentsHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        plans: Arc<dyn PlanRepository>,
        payments: Arc<dyn PaymentRepository>,
    ) -> Self {
        Self {
            subscriptions,
            plans,
            payments,
        }
    }

    pub async fn handle(
        &self,
        command: GeneratePaymentsCommand,
    ) -> Result<Vec<Payment>, BillingError> {
        let subscription = self
            .subscriptions
            .find_by_id(&command.subscription_id)
            .await?
            .ok_or_else(|| BillingError::subscription_not_found(command.subscription_id))?;

        if !subscription.active {
            return Err(BillingError::validation(
                "subscription",
                "cannot generate payments for a paused subscription",
            ));
        }

        let plan = self
            .plans
            .find_by_id(&subscription.plan_id)
            .await?
            .ok_or_else(|| BillingError::plan_not_found(subscription.plan_id))?;

        let latest = self.payments.latest_scheduled(&subscription.id).await?;
        let dates = next_scheduled_dates(
            subscription.start_date,
            latest,
            plan.billing_interval_days,
            command.count,
        )?;

        let batch: Vec<Payment> = dates
            .into_iter()
            .map(|scheduled| {
                Payment::new_pending(PaymentId::new(), subscription.id, scheduled, plan.price)
            })
            .collect();

        self.payments.save_batch(&batch).await?;

        tracing::info!(
            subscription_id = %subscription.id,
            count = batch.len(),
            "payment schedule generated"
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryPaymentRepository, InMemoryPlanRepository, InMemorySubscriptionRepository,
    };
    use crate::domain::billing::{PaymentPlan, PaymentStatus, Subscription};
    use crate::domain::foundation::{ClientId, Money, PlanId, TrainerId};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        payments: Arc<InMemoryPaymentRepository>,
        handler: GeneratePaymentsHandler,
        subscription: Subscription,
    }

    async fn fixture() -> Fixture {
        let plans = Arc::new(InMemoryPlanRepository::new());
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new(plans.clone()));
        let payments = Arc::new(InMemoryPaymentRepository::new());

        let plan = PaymentPlan::new(
            PlanId::new(),
            TrainerId::new(),
            "Monthly".to_string(),
            None,
            5000,
            30,
        )
        .unwrap();
        plans.save(&plan).await.unwrap();

        let subscription = Subscription::new(
            crate::domain::foundation::SubscriptionId::new(),
            plan.id,
            ClientId::new(),
            date(2024, 1, 1),
            None,
            None,
        )
        .unwrap();
        subscriptions.save(&subscription).await.unwrap();

        let handler =
            GeneratePaymentsHandler::new(subscriptions, plans, payments.clone());
        Fixture {
            payments,
            handler,
            subscription,
        }
    }

    #[tokio::test]
    async fn first_batch_starts_on_subscription_start() {
        let f = fixture().await;

        let batch = f
            .handler
            .handle(GeneratePaymentsCommand {
                subscription_id: f.subscription.id,
                count: 3,
            })
            .await
            .unwrap();

        let dates: Vec<NaiveDate> = batch.iter().map(|p| p.scheduled_date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 31), date(2024, 3, 1)]
        );
        assert!(batch.iter().all(|p| p.status == PaymentStatus::Pending));
        assert!(batch.iter().all(|p| p.amount.as_cents() == 5000));
    }

    #[tokio::test]
    async fn second_batch_continues_after_the_latest_payment() {
        let f = fixture().await;
        let command = GeneratePaymentsCommand {
            subscription_id: f.subscription.id,
            count: 2,
        };

        f.handler.handle(command.clone()).await.unwrap();
        let second = f.handler.handle(command).await.unwrap();

        // First batch ended at Jan 31; continuation starts one interval later.
        assert_eq!(second[0].scheduled_date, date(2024, 3, 1));
        assert_eq!(second[1].scheduled_date, date(2024, 3, 31));
        assert_eq!(f.payments.all().len(), 4);
    }

    #[tokio::test]
    async fn price_snapshot_survives_later_plan_changes() {
        let f = fixture().await;

        let batch = f
            .handler
            .handle(GeneratePaymentsCommand {
                subscription_id: f.subscription.id,
                count: 1,
            })
            .await
            .unwrap();

        // The stored payment keeps its own amount copy.
        let stored = f.payments.find_by_id(&batch[0].id).await.unwrap().unwrap();
        assert_eq!(stored.amount, Money::from_cents(5000).unwrap());
    }

    #[tokio::test]
    async fn zero_count_is_rejected_before_any_write() {
        let f = fixture().await;

        let result = f
            .handler
            .handle(GeneratePaymentsCommand {
                subscription_id: f.subscription.id,
                count: 0,
            })
            .await;

        assert!(matches!(
            result,
            Err(BillingError::ValidationFailed { .. })
        ));
        assert!(f.payments.all().is_empty());
    }

    #[tokio::test]
    async fn missing_subscription_is_not_found() {
        let f = fixture().await;

        let result = f
            .handler
            .handle(GeneratePaymentsCommand {
                subscription_id: crate::domain::foundation::SubscriptionId::new(),
                count: 1,
            })
            .await;

        assert!(matches!(
            result,
            Err(BillingError::SubscriptionNotFound(_))
        ));
    }
}
