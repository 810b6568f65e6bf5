//! DeleteSubscriptionHandler - Command handler for removing a subscription.

use std::sync::Arc;

use crate::domain::billing::BillingError;
use crate::domain::foundation::SubscriptionId;
use crate::ports::{PaymentRepository, SubscriptionRepository};

/// Command to delete a subscription.
#[derive(Debug, Clone)]
pub struct DeleteSubscriptionCommand {
    pub subscription_id: SubscriptionId,
}

/// Handler for subscription deletion.
///
/// A subscription that still owns payments is never deleted; callers
/// must delete the payments first. There is no partial cascade.
pub struct DeleteSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl DeleteSubscriptionHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        payments: Arc<dyn PaymentRepository>,
    ) -> Self {
        Self {
            subscriptions,
            payments,
        }
    }

    pub async fn handle(&self, command: DeleteSubscriptionCommand) -> Result<(), BillingError> {
        let subscription = self
            .subscriptions
            .find_by_id(&command.subscription_id)
            .await?
            .ok_or_else(|| BillingError::subscription_not_found(command.subscription_id))?;

        let payment_count = self.payments.count_by_subscription(&subscription.id).await?;
        if payment_count > 0 {
            return Err(BillingError::has_payments(subscription.id));
        }

        self.subscriptions.delete(&subscription.id).await?;

        tracing::info!(subscription_id = %subscription.id, "subscription deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryPaymentRepository, InMemoryPlanRepository, InMemorySubscriptionRepository,
    };
    use crate::domain::billing::{Payment, Subscription};
    use crate::domain::foundation::{ClientId, Money, PaymentId, PlanId};
    use chrono::NaiveDate;

    struct Fixture {
        subscriptions: Arc<InMemorySubscriptionRepository>,
        payments: Arc<InMemoryPaymentRepository>,
        subscription: Subscription,
    }

    async fn fixture() -> Fixture {
        let plans = Arc::new(InMemoryPlanRepository::new());
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new(plans));
        let payments = Arc::new(InMemoryPaymentRepository::new());
        let subscription = Subscription::new(
            SubscriptionId::new(),
            PlanId::new(),
            ClientId::new(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            None,
            None,
        )
        .unwrap();
        subscriptions.save(&subscription).await.unwrap();
        Fixture {
            subscriptions,
            payments,
            subscription,
        }
    }

    #[tokio::test]
    async fn deletes_subscription_without_payments() {
        let f = fixture().await;
        let handler =
            DeleteSubscriptionHandler::new(f.subscriptions.clone(), f.payments.clone());

        handler
            .handle(DeleteSubscriptionCommand {
                subscription_id: f.subscription.id,
            })
            .await
            .unwrap();

        assert!(f
            .subscriptions
            .find_by_id(&f.subscription.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn rejects_deletion_while_payments_exist() {
        let f = fixture().await;
        let payment = Payment::new_pending(
            PaymentId::new(),
            f.subscription.id,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Money::from_cents(5000).unwrap(),
        );
        f.payments.save(&payment).await.unwrap();

        let handler =
            DeleteSubscriptionHandler::new(f.subscriptions.clone(), f.payments.clone());
        let result = handler
            .handle(DeleteSubscriptionCommand {
                subscription_id: f.subscription.id,
            })
            .await;

        assert!(matches!(result, Err(BillingError::HasPayments(_))));
        // Subscription survives the rejected delete.
        assert!(f
            .subscriptions
            .find_by_id(&f.subscription.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn deletion_allowed_after_payments_removed() {
        let f = fixture().await;
        let payment = Payment::new_pending(
            PaymentId::new(),
            f.subscription.id,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Money::from_cents(5000).unwrap(),
        );
        f.payments.save(&payment).await.unwrap();
        f.payments.delete(&payment.id).await.unwrap();

        let handler =
            DeleteSubscriptionHandler::new(f.subscriptions.clone(), f.payments.clone());
        let result = handler
            .handle(DeleteSubscriptionCommand {
                subscription_id: f.subscription.id,
            })
            .await;

        assert!(result.is_ok());
    }
}
