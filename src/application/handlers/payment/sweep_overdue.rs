//! SweepOverdueHandler - moves pending payments past their date to overdue.
//!
//! The sweep is read-triggered: payment lists and dashboard statistics
//! run it first so they never show stale pending rows. Each row update
//! is conditional on the payment still being pending, so concurrent
//! sweeps from simultaneous dashboard loads converge.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::billing::{classify, BillingError, PaymentStatus};
use crate::domain::foundation::SubscriptionId;
use crate::ports::PaymentRepository;

/// Command to sweep a set of subscriptions for overdue payments.
#[derive(Debug, Clone)]
pub struct SweepOverdueCommand {
    pub subscription_ids: Vec<SubscriptionId>,
    pub today: NaiveDate,
}

pub struct SweepOverdueHandler {
    payments: Arc<dyn PaymentRepository>,
}

impl SweepOverdueHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }

    /// Returns the number of payments moved to overdue.
    pub async fn handle(&self, command: SweepOverdueCommand) -> Result<u64, BillingError> {
        Ok(sweep(
            self.payments.as_ref(),
            &command.subscription_ids,
            command.today,
        )
        .await?)
    }
}

/// Reclassifies pending payments whose date has passed.
///
/// Per-row persistence failures are logged and skipped; one bad row
/// never aborts the pass.
pub(crate) async fn sweep(
    payments: &dyn PaymentRepository,
    subscription_ids: &[SubscriptionId],
    today: NaiveDate,
) -> Result<u64, BillingError> {
    let candidates = payments
        .list_pending_due_before(subscription_ids, today)
        .await?;

    let mut transitioned = 0u64;
    for payment in &candidates {
        if classify(payment, today) != PaymentStatus::Overdue {
            continue;
        }
        match payments.mark_overdue_if_pending(&payment.id).await {
            Ok(true) => transitioned += 1,
            Ok(false) => {} // Another sweep got there first.
            Err(e) => {
                tracing::warn!(
                    payment_id = %payment.id,
                    error = %e,
                    "failed to mark payment overdue, skipping"
                );
            }
        }
    }

    if transitioned > 0 {
        tracing::info!(count = transitioned, "payments moved to overdue");
    }
    Ok(transitioned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPaymentRepository;
    use crate::domain::billing::Payment;
    use crate::domain::foundation::{Money, PaymentId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pending(subscription_id: SubscriptionId, scheduled: NaiveDate) -> Payment {
        Payment::new_pending(
            PaymentId::new(),
            subscription_id,
            scheduled,
            Money::from_cents(5000).unwrap(),
        )
    }

    #[tokio::test]
    async fn moves_past_pending_payments_to_overdue() {
        let repo = Arc::new(InMemoryPaymentRepository::new());
        let subscription_id = SubscriptionId::new();
        let today = date(2024, 3, 10);

        repo.save(&pending(subscription_id, date(2024, 3, 1))).await.unwrap();
        repo.save(&pending(subscription_id, date(2024, 3, 10))).await.unwrap();
        repo.save(&pending(subscription_id, date(2024, 3, 20))).await.unwrap();

        let handler = SweepOverdueHandler::new(repo.clone());
        let transitioned = handler
            .handle(SweepOverdueCommand {
                subscription_ids: vec![subscription_id],
                today,
            })
            .await
            .unwrap();

        assert_eq!(transitioned, 1);
        let statuses: Vec<PaymentStatus> = repo
            .list_by_subscription(&subscription_id)
            .await
            .unwrap()
            .iter()
            .map(|p| p.status)
            .collect();
        assert_eq!(
            statuses,
            vec![
                PaymentStatus::Overdue,
                PaymentStatus::Pending,
                PaymentStatus::Pending
            ]
        );
    }

    #[tokio::test]
    async fn sweep_is_idempotent() {
        let repo = Arc::new(InMemoryPaymentRepository::new());
        let subscription_id = SubscriptionId::new();
        let today = date(2024, 3, 10);
        repo.save(&pending(subscription_id, date(2024, 3, 1))).await.unwrap();

        let handler = SweepOverdueHandler::new(repo.clone());
        let command = SweepOverdueCommand {
            subscription_ids: vec![subscription_id],
            today,
        };

        assert_eq!(handler.handle(command.clone()).await.unwrap(), 1);
        assert_eq!(handler.handle(command).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn ignores_payments_outside_the_scope() {
        let repo = Arc::new(InMemoryPaymentRepository::new());
        let inside = SubscriptionId::new();
        let outside = SubscriptionId::new();
        let today = date(2024, 3, 10);

        repo.save(&pending(inside, date(2024, 3, 1))).await.unwrap();
        repo.save(&pending(outside, date(2024, 3, 1))).await.unwrap();

        let handler = SweepOverdueHandler::new(repo.clone());
        handler
            .handle(SweepOverdueCommand {
                subscription_ids: vec![inside],
                today,
            })
            .await
            .unwrap();

        let untouched = repo.list_by_subscription(&outside).await.unwrap();
        assert_eq!(untouched[0].status, PaymentStatus::Pending);
    }
}
