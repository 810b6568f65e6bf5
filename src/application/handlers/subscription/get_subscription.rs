//! GetSubscriptionHandler - Query handler for a subscription detail view.

use std::sync::Arc;

use crate::domain::billing::{BillingError, PaymentPlan, Subscription};
use crate::domain::foundation::SubscriptionId;
use crate::ports::{ClientContact, ClientDirectory, PlanRepository, SubscriptionRepository};

/// Query for a single subscription with plan terms and client contact.
#[derive(Debug, Clone)]
pub struct GetSubscriptionQuery {
    pub subscription_id: SubscriptionId,
}

/// Detail view joining plan terms and the client's contact card.
#[derive(Debug, Clone)]
pub struct SubscriptionView {
    pub subscription: Subscription,
    pub plan: PaymentPlan,
    /// `None` when the directory has no card for the client.
    pub client: Option<ClientContact>,
}

pub struct GetSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    plans: Arc<dyn PlanRepository>,
    clients: Arc<dyn ClientDirectory>,
}

impl GetSubscriptionHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        plans: Arc<dyn PlanRepository>,
        clients: Arc<dyn ClientDirectory>,
    ) -> Self {
        Self {
            subscriptions,
            plans,
            clients,
        }
    }

    pub async fn handle(
        &self,
        query: GetSubscriptionQuery,
    ) -> Result<SubscriptionView, BillingError> {
        let subscription = self
            .subscriptions
            .find_by_id(&query.subscription_id)
            .await?
            .ok_or_else(|| BillingError::subscription_not_found(query.subscription_id))?;

        let plan = self
            .plans
            .find_by_id(&subscription.plan_id)
            .await?
            .ok_or_else(|| BillingError::plan_not_found(subscription.plan_id))?;

        // Contact lookup is presentation-only; a missing card is not an error.
        let client = self.clients.find_contact(&subscription.client_id).await?;

        Ok(SubscriptionView {
            subscription,
            plan,
            client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryPlanRepository, InMemorySubscriptionRepository, StaticClientDirectory,
    };
    use crate::domain::foundation::{ClientId, PlanId, TrainerId};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn joins_plan_and_client_contact() {
        let plans = Arc::new(InMemoryPlanRepository::new());
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new(plans.clone()));
        let directory = Arc::new(StaticClientDirectory::new());

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

        let client_id = ClientId::new();
        directory.insert(ClientContact {
            id: client_id,
            name: "Ana García".to_string(),
            email: Some("ana@example.com".to_string()),
            phone: None,
        });

        let subscription = Subscription::new(
            SubscriptionId::new(),
            plan.id,
            client_id,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            None,
            None,
        )
        .unwrap();
        subscriptions.save(&subscription).await.unwrap();

        let handler = GetSubscriptionHandler::new(subscriptions, plans, directory);
        let view = handler
            .handle(GetSubscriptionQuery {
                subscription_id: subscription.id,
            })
            .await
            .unwrap();

        assert_eq!(view.plan.id, plan.id);
        assert_eq!(view.client.unwrap().name, "Ana García");
    }

    #[tokio::test]
    async fn missing_contact_is_not_an_error() {
        let plans = Arc::new(InMemoryPlanRepository::new());
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new(plans.clone()));
        let directory = Arc::new(StaticClientDirectory::new());

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
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            None,
            None,
        )
        .unwrap();
        subscriptions.save(&subscription).await.unwrap();

        let handler = GetSubscriptionHandler::new(subscriptions, plans, directory);
        let view = handler
            .handle(GetSubscriptionQuery {
                subscription_id: subscription.id,
            })
            .await
            .unwrap();

        assert!(view.client.is_none());
    }

    #[tokio::test]
    async fn missing_subscription_is_not_found() {
        let plans = Arc::new(InMemoryPlanRepository::new());
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new(plans.clone()));
        let directory = Arc::new(StaticClientDirectory::new());

        let handler = GetSubscriptionHandler::new(subscriptions, plans, directory);
        let result = handler
            .handle(GetSubscriptionQuery {
                subscription_id: SubscriptionId::new(),
            })
            .await;

        assert!(matches!(
            result,
            Err(BillingError::SubscriptionNotFound(_))
        ));
    }
}
