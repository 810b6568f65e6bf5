//! CancelPaymentHandler - Command handler for voiding a payment.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Payment};
use crate::domain::foundation::PaymentId;
use crate::ports::PaymentRepository;

/// Command to cancel a payment. Terminal.
#[derive(Debug, Clone)]
pub struct CancelPaymentCommand {
    pub payment_id: PaymentId,
}

pub struct CancelPaymentHandler {
    payments: Arc<dyn PaymentRepository>,
}

impl CancelPaymentHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }

    pub async fn handle(&self, command: CancelPaymentCommand) -> Result<Payment, BillingError> {
        let mut payment = self
            .payments
            .find_by_id(&command.payment_id)
            .await?
            .ok_or_else(|| BillingError::payment_not_found(command.payment_id))?;

        let current = payment.status;
        payment
            .cancel()
            .map_err(|_| BillingError::invalid_state(format!("{:?}", current), "cancel"))?;

        self.payments.update(&payment).await?;

        tracing::info!(payment_id = %payment.id, "payment cancelled");
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPaymentRepository;
    use crate::domain::billing::PaymentStatus;
    use crate::domain::foundation::{Money, SubscriptionId};
    use chrono::NaiveDate;

    async fn seeded() -> (Arc<InMemoryPaymentRepository>, Payment) {
        let repo = Arc::new(InMemoryPaymentRepository::new());
        let payment = Payment::new_pending(
            PaymentId::new(),
            SubscriptionId::new(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            Money::from_cents(5000).unwrap(),
        );
        repo.save(&payment).await.unwrap();
        (repo, payment)
    }

    #[tokio::test]
    async fn cancels_a_pending_payment() {
        let (repo, payment) = seeded().await;
        let handler = CancelPaymentHandler::new(repo.clone());

        let cancelled = handler
            .handle(CancelPaymentCommand {
                payment_id: payment.id,
            })
            .await
            .unwrap();

        assert_eq!(cancelled.status, PaymentStatus::Cancelled);
    }

    #[tokio::test]
    async fn double_cancel_is_an_invalid_state() {
        let (repo, payment) = seeded().await;
        let handler = CancelPaymentHandler::new(repo);
        let command = CancelPaymentCommand {
            payment_id: payment.id,
        };

        handler.handle(command.clone()).await.unwrap();
        let result = handler.handle(command).await;

        assert!(matches!(result, Err(BillingError::InvalidState { .. })));
    }
}
