//! ListPaymentsHandler - Query handler for a subscription's payments.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::billing::{BillingError, Payment};
use crate::domain::foundation::SubscriptionId;
use crate::ports::{PaymentRepository, SubscriptionRepository};

use super::sweep_overdue::sweep;

/// Query for a subscription's payment history.
#[derive(Debug, Clone)]
pub struct ListPaymentsQuery {
    pub subscription_id: SubscriptionId,
    pub today: NaiveDate,
}

/// Handler for payment listing.
///
/// Runs the overdue sweep for the subscription first, so the returned
/// statuses reflect the calendar, then lists ascending by scheduled
/// date.
pub struct ListPaymentsHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl ListPaymentsHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        payments: Arc<dyn PaymentRepository>,
    ) -> Self {
        Self {
            subscriptions,
            payments,
        }
    }

    pub async fn handle(&self, query: ListPaymentsQuery) -> Result<Vec<Payment>, BillingError> {
        let subscription = self
            .subscriptions
            .find_by_id(&query.subscription_id)
            .await?
            .ok_or_else(|| BillingError::subscription_not_found(query.subscription_id))?;

        sweep(self.payments.as_ref(), &[subscription.id], query.today).await?;

        Ok(self.payments.list_by_subscription(&subscription.id).await?)
    }
}
