//! In-memory billing reader implementation.
//!
//! Delegates to the pure aggregation in the domain so the read model
//! matches what the SQL reader computes in queries.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::billing::{compute_statistics, BillingStatistics, Payment};
use crate::domain::foundation::{DomainError, SubscriptionId};
use crate::ports::{BillingReader, PaymentRepository};

/// In-memory implementation of the BillingReader port.
pub struct InMemoryBillingReader {
    payments: Arc<dyn PaymentRepository>,
}

impl InMemoryBillingReader {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }
}

#[async_trait]
impl BillingReader for InMemoryBillingReader {
    async fn statistics(
        &self,
        subscription_ids: &[SubscriptionId],
        today: NaiveDate,
    ) -> Result<BillingStatistics, DomainError> {
        let mut scope: Vec<Payment> = Vec::new();
        for id in subscription_ids {
            scope.extend(self.payments.list_by_subscription(id).await?);
        }
        Ok(compute_statistics(&scope, today))
    }
}
