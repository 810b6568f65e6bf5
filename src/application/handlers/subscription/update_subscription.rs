//! UpdateSubscriptionHandler - Command handler for partial subscription updates.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::billing::{BillingError, Subscription, SubscriptionUpdate};
use crate::domain::foundation::SubscriptionId;
use crate::ports::SubscriptionRepository;

/// Command to update a subscription's date range or notes.
#[derive(Debug, Clone, Default)]
pub struct UpdateSubscriptionCommand {
    pub subscription_id: SubscriptionId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
}

pub struct UpdateSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl UpdateSubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    pub async fn handle(
        &self,
        command: UpdateSubscriptionCommand,
    ) -> Result<Subscription, BillingError> {
        let mut subscription = self
            .subscriptions
            .find_by_id(&command.subscription_id)
            .await?
            .ok_or_else(|| BillingError::subscription_not_found(command.subscription_id))?;

        subscription.apply_update(SubscriptionUpdate {
            start_date: command.start_date,
            end_date: command.end_date,
            notes: command.notes,
        })?;

        self.subscriptions.update(&subscription).await?;

        tracing::info!(subscription_id = %subscription.id, "subscription updated");
        Ok(subscription)
    }
}
