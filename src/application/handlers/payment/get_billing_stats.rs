//! GetBillingStatsHandler - Query handler for dashboard statistics.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::billing::{BillingError, BillingStatistics};
use crate::domain::foundation::{SubscriptionId, TrainerId};
use crate::ports::{BillingReader, PaymentRepository, SubscriptionRepository};

use super::sweep_overdue::sweep;

/// Query for billing statistics.
///
/// Without a `subscription_id` the scope is every subscription under
/// the trainer's plans; with one, that single subscription (which must
/// be in the trainer's scope).
#[derive(Debug, Clone)]
pub struct GetBillingStatsQuery {
    pub trainer_id: TrainerId,
    pub subscription_id: Option<SubscriptionId>,
    pub today: NaiveDate,
}

/// Handler for dashboard statistics.
///
/// Runs the overdue sweep over the resolved scope first so counts
/// reflect the calendar, then reads. No other side effects.
pub struct GetBillingStatsHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    payments: Arc<dyn PaymentRepository>,
    reader: Arc<dyn BillingReader>,
}

impl GetBillingStatsHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        payments: Arc<dyn PaymentRepository>,
        reader: Arc<dyn BillingReader>,
    ) -> Self {
        Self {
            subscriptions,
            payments,
            reader,
        }
    }

    pub async fn handle(
        &self,
        query: GetBillingStatsQuery,
    ) -> Result<BillingStatistics, BillingError> {
        let scope = self.resolve_scope(&query).await?;

        sweep(self.payments.as_ref(), &scope, query.today).await?;

        Ok(self.reader.statistics(&scope, query.today).await?)
    }

    async fn resolve_scope(
        &self,
        query: &GetBillingStatsQuery,
    ) -> Result<Vec<SubscriptionId>, BillingError> {
        let owned = self
            .subscriptions
            .list_by_trainer(&query.trainer_id)
            .await?;

        match query.subscription_id {
            Some(id) => {
                if !owned.iter().any(|s| s.id == id) {
                    return Err(BillingError::subscription_not_found(id));
                }
                Ok(vec![id])
            }
            None => Ok(owned.into_iter().map(|s| s.id).collect()),
        }
    }
}
