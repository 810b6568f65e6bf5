//! ToggleSubscriptionHandler - Command handler for pausing/resuming a subscription.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Subscription};
use crate::domain::foundation::SubscriptionId;
use crate::ports::SubscriptionRepository;

/// Command to flip a subscription's active flag.
#[derive(Debug, Clone)]
pub struct ToggleSubscriptionCommand {
    pub subscription_id: SubscriptionId,
}

/// Handler for pausing and resuming subscriptions.
///
/// Pausing stops future schedule generation; payments already
/// generated keep their lifecycle.
pub struct ToggleSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl ToggleSubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    pub async fn handle(
        &self,
        command: ToggleSubscriptionCommand,
    ) -> Result<Subscription, BillingError> {
        let mut subscription = self
            .subscriptions
            .find_by_id(&command.subscription_id)
            .await?
            .ok_or_else(|| BillingError::subscription_not_found(command.subscription_id))?;

        subscription.toggle_active();
        self.subscriptions.update(&subscription).await?;

        tracing::info!(
            subscription_id = %subscription.id,
            active = subscription.active,
            "subscription toggled"
        );
        Ok(subscription)
    }
}
