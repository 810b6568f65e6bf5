//! DeletePaymentHandler - Command handler for removing a payment row.

use std::sync::Arc;

use crate::domain::billing::BillingError;
use crate::domain::foundation::PaymentId;
use crate::ports::PaymentRepository;

/// Command to delete a payment.
#[derive(Debug, Clone)]
pub struct DeletePaymentCommand {
    pub payment_id: PaymentId,
}

/// Handler for payment deletion.
///
/// Deleting all of a subscription's payments is the required first
/// step before the subscription itself can be removed.
pub struct DeletePaymentHandler {
    payments: Arc<dyn PaymentRepository>,
}

impl DeletePaymentHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }

    pub async fn handle(&self, command: DeletePaymentCommand) -> Result<(), BillingError> {
        let payment = self
            .payments
            .find_by_id(&command.payment_id)
            .await?
            .ok_or_else(|| BillingError::payment_not_found(command.payment_id))?;

        self.payments.delete(&payment.id).await?;

        tracing::info!(payment_id = %payment.id, "payment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPaymentRepository;
    use crate::domain::billing::Payment;
    use crate::domain::foundation::{Money, SubscriptionId};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn deletes_an_existing_payment() {
        let repo = Arc::new(InMemoryPaymentRepository::new());
        let payment = Payment::new_pending(
            PaymentId::new(),
            SubscriptionId::new(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            Money::from_cents(5000).unwrap(),
        );
        repo.save(&payment).await.unwrap();

        let handler = DeletePaymentHandler::new(repo.clone());
        handler
            .handle(DeletePaymentCommand {
                payment_id: payment.id,
            })
            .await
            .unwrap();

        assert!(repo.find_by_id(&payment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_payment_is_not_found() {
        let repo = Arc::new(InMemoryPaymentRepository::new());
        let handler = DeletePaymentHandler::new(repo);

        let result = handler
            .handle(DeletePaymentCommand {
                payment_id: PaymentId::new(),
            })
            .await;

        assert!(matches!(result, Err(BillingError::PaymentNotFound(_))));
    }
}
