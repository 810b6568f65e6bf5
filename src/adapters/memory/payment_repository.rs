//! In-memory payment repository implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Mutex;

use crate::domain::billing::{Payment, PaymentStatus};
use crate::domain::foundation::{DomainError, ErrorCode, PaymentId, SubscriptionId};
use crate::ports::PaymentRepository;

/// In-memory implementation of the PaymentRepository port.
#[derive(Default)]
pub struct InMemoryPaymentRepository {
    payments: Mutex<Vec<Payment>>,
}

impl InMemoryPaymentRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every stored payment.
    ///
    /// Useful for assertions in integration tests.
    pub fn all(&self) -> Vec<Payment> {
        self.payments.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn save(&self, payment: &Payment) -> Result<(), DomainError> {
        self.payments.lock().unwrap().push(payment.clone());
        Ok(())
    }

    async fn save_batch(&self, payments: &[Payment]) -> Result<(), DomainError> {
        // Single lock acquisition keeps the batch atomic.
        self.payments
            .lock()
            .unwrap()
            .extend(payments.iter().cloned());
        Ok(())
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut payments = self.payments.lock().unwrap();
        match payments.iter_mut().find(|p| p.id == payment.id) {
            Some(existing) => {
                *existing = payment.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::PaymentNotFound,
                format!("Payment not found: {}", payment.id),
            )
            .with_detail("id", payment.id.to_string())),
        }
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.id == id)
            .cloned())
    }

    async fn list_by_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Vec<Payment>, DomainError> {
        let mut payments: Vec<Payment> = self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| &p.subscription_id == subscription_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| p.scheduled_date);
        Ok(payments)
    }

    async fn count_by_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<i64, DomainError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| &p.subscription_id == subscription_id)
            .count() as i64)
    }

    async fn latest_scheduled(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Option<NaiveDate>, DomainError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| &p.subscription_id == subscription_id)
            .map(|p| p.scheduled_date)
            .max())
    }

    async fn list_pending_due_before(
        &self,
        subscription_ids: &[SubscriptionId],
        today: NaiveDate,
    ) -> Result<Vec<Payment>, DomainError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| {
                p.status == PaymentStatus::Pending
                    && p.scheduled_date < today
                    && subscription_ids.contains(&p.subscription_id)
            })
            .cloned()
            .collect())
    }

    async fn mark_overdue_if_pending(&self, id: &PaymentId) -> Result<bool, DomainError> {
        let mut payments = self.payments.lock().unwrap();
        match payments.iter_mut().find(|p| &p.id == id) {
            Some(payment) if payment.status == PaymentStatus::Pending => {
                payment
                    .mark_overdue()
                    .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: &PaymentId) -> Result<(), DomainError> {
        let mut payments = self.payments.lock().unwrap();
        let before = payments.len();
        payments.retain(|p| &p.id != id);
        if payments.len() == before {
            return Err(DomainError::new(
                ErrorCode::PaymentNotFound,
                format!("Payment not found: {}", id),
            )
            .with_detail("id", id.to_string()));
        }
        Ok(())
    }
}
