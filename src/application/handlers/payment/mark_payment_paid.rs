//! MarkPaymentPaidHandler - Command handler for settling a payment.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::billing::{BillingError, Payment};
use crate::domain::foundation::PaymentId;
use crate::ports::PaymentRepository;

/// Command to settle a pending or overdue payment.
#[derive(Debug, Clone)]
pub struct MarkPaymentPaidCommand {
    pub payment_id: PaymentId,
    /// Defaults to today when omitted.
    pub paid_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
}

pub struct MarkPaymentPaidHandler {
    payments: Arc<dyn PaymentRepository>,
}

impl MarkPaymentPaidHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }

    pub async fn handle(&self, command: MarkPaymentPaidCommand) -> Result<Payment, BillingError> {
        let mut payment = self
            .payments
            .find_by_id(&command.payment_id)
            .await?
            .ok_or_else(|| BillingError::payment_not_found(command.payment_id))?;

        let paid_date = command
            .paid_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let current = payment.status;
        payment
            .mark_paid(paid_date, command.payment_method)
            .map_err(|_| BillingError::invalid_state(format!("{:?}", current), "pay"))?;

        self.payments.update(&payment).await?;

        tracing::info!(payment_id = %payment.id, %paid_date, "payment settled");
        Ok(payment)
    }
}
