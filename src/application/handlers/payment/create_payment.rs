//! CreatePaymentHandler - Command handler for ad-hoc payment entry.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::billing::{BillingError, Payment};
use crate::domain::foundation::{Money, PaymentId, SubscriptionId};
use crate::ports::{PaymentRepository, PlanRepository, SubscriptionRepository};

/// Command to record a single payment outside the generated schedule.
///
/// The amount defaults to the plan price. A supplied `paid_date` means
/// the money already changed hands, so the payment is stored settled.
#[derive(Debug, Clone)]
pub struct CreatePaymentCommand {
    pub subscription_id: SubscriptionId,
    pub scheduled_date: NaiveDate,
    pub amount_cents: Option<i64>,
    pub paid_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
}

pub struct CreatePaymentHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    plans: Arc<dyn PlanRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl CreatePaymentHandler {
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

    pub async fn handle(&self, command: CreatePaymentCommand) -> Result<Payment, BillingError> {
        let subscription = self
            .subscriptions
            .find_by_id(&command.subscription_id)
            .await?
            .ok_or_else(|| BillingError::subscription_not_found(command.subscription_id))?;

        let plan = self
            .plans
            .find_by_id(&subscription.plan_id)
            .await?
            .ok_or_else(|| BillingError::plan_not_found(subscription.plan_id))?;

        let amount = match command.amount_cents {
            Some(cents) => Money::positive_from_cents(cents).map_err(|e| {
                BillingError::validation("amount", e.to_string())
            })?,
            None => plan.price,
        };

        let payment = match command.paid_date {
            Some(paid_date) => Payment::new_paid(
                PaymentId::new(),
                subscription.id,
                command.scheduled_date,
                paid_date,
                amount,
                command.payment_method,
            ),
            None => {
                let mut p = Payment::new_pending(
                    PaymentId::new(),
                    subscription.id,
                    command.scheduled_date,
                    amount,
                );
                p.payment_method = command.payment_method;
                p
            }
        };

        self.payments.save(&payment).await?;

        tracing::info!(
            payment_id = %payment.id,
            subscription_id = %subscription.id,
            "ad-hoc payment recorded"
        );
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryPaymentRepository, InMemoryPlanRepository, InMemorySubscriptionRepository,
    };
    use crate::domain::billing::{PaymentPlan, PaymentStatus, Subscription};
    use crate::domain::foundation::{ClientId, PlanId, TrainerId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn fixture() -> (CreatePaymentHandler, SubscriptionId) {
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
            SubscriptionId::new(),
            plan.id,
            ClientId::new(),
            date(2024, 1, 1),
            None,
            None,
        )
        .unwrap();
        subscriptions.save(&subscription).await.unwrap();
        let id = subscription.id;

        (
            CreatePaymentHandler::new(subscriptions, plans, payments),
            id,
        )
    }

    #[tokio::test]
    async fn amount_defaults_to_plan_price() {
        let (handler, subscription_id) = fixture().await;

        let payment = handler
            .handle(CreatePaymentCommand {
                subscription_id,
                scheduled_date: date(2024, 2, 1),
                amount_cents: None,
                paid_date: None,
                payment_method: None,
            })
            .await
            .unwrap();

        assert_eq!(payment.amount.as_cents(), 5000);
        assert_eq!(payment.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn supplied_paid_date_stores_a_settled_payment() {
        let (handler, subscription_id) = fixture().await;

        let payment = handler
            .handle(CreatePaymentCommand {
                subscription_id,
                scheduled_date: date(2024, 2, 1),
                amount_cents: Some(4500),
                paid_date: Some(date(2024, 2, 1)),
                payment_method: Some("cash".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.paid_date, Some(date(2024, 2, 1)));
        assert_eq!(payment.amount.as_cents(), 4500);
    }

    #[tokio::test]
    async fn rejects_non_positive_amount() {
        let (handler, subscription_id) = fixture().await;

        let result = handler
            .handle(CreatePaymentCommand {
                subscription_id,
                scheduled_date: date(2024, 2, 1),
                amount_cents: Some(0),
                paid_date: None,
                payment_method: None,
            })
            .await;

        assert!(matches!(
            result,
            Err(BillingError::ValidationFailed { .. })
        ));
    }
}
