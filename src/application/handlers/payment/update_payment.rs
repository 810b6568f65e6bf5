//! UpdatePaymentHandler - Command handler for partial payment updates.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::billing::{BillingError, Payment, PaymentStatus, PaymentUpdate};
use crate::domain::foundation::{Money, PaymentId};
use crate::ports::PaymentRepository;

/// Command to edit a payment.
///
/// A supplied `paid_date` settles the payment regardless of any other
/// field. Clearing the paid date of a settled payment is rejected, and
/// Cancelled payments reject every update.
#[derive(Debug, Clone, Default)]
pub struct UpdatePaymentCommand {
    pub payment_id: PaymentId,
    pub scheduled_date: Option<NaiveDate>,
    pub paid_date: Option<Option<NaiveDate>>,
    pub amount_cents: Option<i64>,
    pub payment_method: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

pub struct UpdatePaymentHandler {
    payments: Arc<dyn PaymentRepository>,
}

impl UpdatePaymentHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }

    pub async fn handle(&self, command: UpdatePaymentCommand) -> Result<Payment, BillingError> {
        let mut payment = self
            .payments
            .find_by_id(&command.payment_id)
            .await?
            .ok_or_else(|| BillingError::payment_not_found(command.payment_id))?;

        if payment.status == PaymentStatus::Cancelled {
            return Err(BillingError::invalid_state("Cancelled", "update"));
        }

        let amount = match command.amount_cents {
            Some(cents) => Some(
                Money::positive_from_cents(cents)
                    .map_err(|e| BillingError::validation("amount", e.to_string()))?,
            ),
            None => None,
        };

        payment.apply_update(PaymentUpdate {
            scheduled_date: command.scheduled_date,
            paid_date: command.paid_date,
            amount,
            payment_method: command.payment_method,
            notes: command.notes,
        })?;

        self.payments.update(&payment).await?;

        tracing::info!(payment_id = %payment.id, "payment updated");
        Ok(payment)
    }
}
