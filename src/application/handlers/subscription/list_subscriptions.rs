//! ListSubscriptionsHandler - Query handler for a trainer's subscriptions.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Subscription};
use crate::domain::foundation::TrainerId;
use crate::ports::SubscriptionRepository;

/// Query for all subscriptions under a trainer's plans.
#[derive(Debug, Clone)]
pub struct ListSubscriptionsQuery {
    pub trainer_id: TrainerId,
}

pub struct ListSubscriptionsHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl ListSubscriptionsHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    pub async fn handle(
        &self,
        query: ListSubscriptionsQuery,
    ) -> Result<Vec<Subscription>, BillingError> {
        Ok(self
            .subscriptions
            .list_by_trainer(&query.trainer_id)
            .await?)
    }
}
