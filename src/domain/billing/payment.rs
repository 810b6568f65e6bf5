//! Payment aggregate and status state machine.
//!
//! A payment is a single expected (or settled) amount tied to a
//! subscription. Status follows a small lifecycle:
//!
//! ```text
//! Pending ──> Overdue ──> Paid ──> Cancelled
//!    │           │                    ▲
//!    ├───────────┼────────────────────┘
//!    └──> Paid ──┘
//! ```
//!
//! Overdue is derived from the calendar, never submitted by callers.
//! Cancelled is terminal.

use crate::domain::foundation::{
    Money, PaymentId, StateMachine, SubscriptionId, Timestamp, ValidationError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Payment status within the billing lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Scheduled but not yet due or settled.
    Pending,

    /// Settled. `paid_date` records when.
    Paid,

    /// Past its scheduled date without settlement.
    /// Derived by the overdue pass, never set directly by callers.
    Overdue,

    /// Voided. Terminal state, excluded from statistics.
    Cancelled,
}

impl PaymentStatus {
    /// Returns true if the payment still awaits settlement.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Overdue)
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, target),
            // From PENDING
            (Pending, Overdue)
                | (Pending, Paid)
                | (Pending, Cancelled)
            // From OVERDUE
                | (Overdue, Paid)
                | (Overdue, Cancelled)
            // From PAID
                | (Paid, Cancelled) // Refund or bookkeeping correction
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Pending => vec![Overdue, Paid, Cancelled],
            Overdue => vec![Paid, Cancelled],
            Paid => vec![Cancelled],
            Cancelled => vec![],
        }
    }
}

/// Classifies a payment against a reference date.
///
/// Pure function so lifecycle rules are testable without a clock:
/// a pending payment whose scheduled date has passed without settlement
/// classifies as overdue, everything else keeps its stored status.
pub fn classify(payment: &Payment, today: NaiveDate) -> PaymentStatus {
    match payment.status {
        PaymentStatus::Pending
            if payment.scheduled_date < today && payment.paid_date.is_none() =>
        {
            PaymentStatus::Overdue
        }
        status => status,
    }
}

/// Payment aggregate.
///
/// # Invariants
///
/// - `paid_date` is present if and only if `status == Paid`
/// - `amount` is a snapshot of the plan price at generation time
/// - Cancelled payments reject every further mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier for this payment.
    pub id: PaymentId,

    /// Subscription this payment belongs to.
    pub subscription_id: SubscriptionId,

    /// Day the payment falls due.
    pub scheduled_date: NaiveDate,

    /// Day the payment was settled. Present exactly when status is Paid.
    pub paid_date: Option<NaiveDate>,

    /// Amount owed, in cents. Snapshot of the plan price.
    pub amount: Money,

    /// Lifecycle status.
    pub status: PaymentStatus,

    /// How the payment was made (free text, e.g. "cash", "transfer").
    pub payment_method: Option<String>,

    /// Free-form notes.
    pub notes: Option<String>,

    /// When the payment row was created.
    pub created_at: Timestamp,

    /// When the payment row was last updated.
    pub updated_at: Timestamp,
}

/// Partial update to a payment. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PaymentUpdate {
    pub scheduled_date: Option<NaiveDate>,
    pub paid_date: Option<Option<NaiveDate>>,
    pub amount: Option<Money>,
    pub payment_method: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl Payment {
    /// Create a pending payment.
    pub fn new_pending(
        id: PaymentId,
        subscription_id: SubscriptionId,
        scheduled_date: NaiveDate,
        amount: Money,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            subscription_id,
            scheduled_date,
            paid_date: None,
            amount,
            status: PaymentStatus::Pending,
            payment_method: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a payment that is already settled.
    ///
    /// Used by ad-hoc payment entry when the trainer records money that
    /// has already changed hands.
    pub fn new_paid(
        id: PaymentId,
        subscription_id: SubscriptionId,
        scheduled_date: NaiveDate,
        paid_date: NaiveDate,
        amount: Money,
        payment_method: Option<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            subscription_id,
            scheduled_date,
            paid_date: Some(paid_date),
            amount,
            status: PaymentStatus::Paid,
            payment_method,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Settle the payment.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` unless the current status is Pending
    /// or Overdue.
    pub fn mark_paid(
        &mut self,
        paid_date: NaiveDate,
        payment_method: Option<String>,
    ) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(PaymentStatus::Paid)?;
        self.paid_date = Some(paid_date);
        if payment_method.is_some() {
            self.payment_method = payment_method;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Move a pending payment to overdue.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the payment is not Pending.
    pub fn mark_overdue(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(PaymentStatus::Overdue)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Void the payment. Terminal.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the payment is already Cancelled.
    pub fn cancel(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(PaymentStatus::Cancelled)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Apply a partial update.
    ///
    /// Setting a `paid_date` settles the payment; on an already settled
    /// payment it corrects the recorded date. The `paid_date ⟺ Paid`
    /// pairing always holds after this returns.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the payment is Cancelled, the amount
    /// is not positive, or the update would clear the paid date of a
    /// settled payment (there is no Paid to Pending direction).
    pub fn apply_update(&mut self, update: PaymentUpdate) -> Result<(), ValidationError> {
        if self.status == PaymentStatus::Cancelled {
            return Err(ValidationError::invalid_format(
                "status",
                "cancelled payments cannot be updated",
            ));
        }
        if let Some(amount) = update.amount {
            if amount.is_zero() {
                return Err(ValidationError::not_positive("amount", 0));
            }
            self.amount = amount;
        }
        if let Some(scheduled_date) = update.scheduled_date {
            self.scheduled_date = scheduled_date;
        }
        if let Some(payment_method) = update.payment_method {
            self.payment_method = payment_method;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        if let Some(paid_date) = update.paid_date {
            match paid_date {
                Some(date) => {
                    if self.status != PaymentStatus::Paid {
                        self.status = self.status.transition_to(PaymentStatus::Paid)?;
                    }
                    self.paid_date = Some(date);
                }
                None => {
                    if self.status == PaymentStatus::Paid {
                        return Err(ValidationError::invalid_format(
                            "paid_date",
                            "a settled payment cannot be reopened",
                        ));
                    }
                    // Outstanding payments never carry a paid date.
                    self.paid_date = None;
                }
            }
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pending_payment(scheduled: NaiveDate) -> Payment {
        Payment::new_pending(
            PaymentId::new(),
            SubscriptionId::new(),
            scheduled,
            Money::from_cents(5000).unwrap(),
        )
    }

    // Unit Tests - State Transitions

    #[test]
    fn pending_can_transition_to_overdue_paid_and_cancelled() {
        let status = PaymentStatus::Pending;
        assert!(status.can_transition_to(&PaymentStatus::Overdue));
        assert!(status.can_transition_to(&PaymentStatus::Paid));
        assert!(status.can_transition_to(&PaymentStatus::Cancelled));
    }

    #[test]
    fn overdue_cannot_return_to_pending() {
        assert!(!PaymentStatus::Overdue.can_transition_to(&PaymentStatus::Pending));
    }

    #[test]
    fn cancelled_is_terminal() {
        assert!(PaymentStatus::Cancelled.is_terminal());
        assert!(!PaymentStatus::Pending.is_terminal());
    }

    #[test]
    fn paid_can_only_be_cancelled() {
        assert_eq!(
            PaymentStatus::Paid.valid_transitions(),
            vec![PaymentStatus::Cancelled]
        );
    }

    // Unit Tests - classify

    #[test]
    fn classify_marks_past_pending_as_overdue() {
        let payment = pending_payment(date(2024, 3, 1));
        assert_eq!(
            classify(&payment, date(2024, 3, 2)),
            PaymentStatus::Overdue
        );
    }

    #[test]
    fn classify_keeps_pending_on_the_scheduled_day() {
        // Due today is not overdue yet.
        let payment = pending_payment(date(2024, 3, 1));
        assert_eq!(
            classify(&payment, date(2024, 3, 1)),
            PaymentStatus::Pending
        );
    }

    #[test]
    fn classify_keeps_future_pending() {
        let payment = pending_payment(date(2024, 3, 10));
        assert_eq!(
            classify(&payment, date(2024, 3, 1)),
            PaymentStatus::Pending
        );
    }

    #[test]
    fn classify_never_touches_paid_or_cancelled() {
        let mut paid = pending_payment(date(2024, 3, 1));
        paid.mark_paid(date(2024, 3, 1), None).unwrap();
        assert_eq!(classify(&paid, date(2024, 6, 1)), PaymentStatus::Paid);

        let mut cancelled = pending_payment(date(2024, 3, 1));
        cancelled.cancel().unwrap();
        assert_eq!(
            classify(&cancelled, date(2024, 6, 1)),
            PaymentStatus::Cancelled
        );
    }

    // Unit Tests - Aggregate mutations

    #[test]
    fn mark_paid_sets_paid_date_and_status() {
        let mut payment = pending_payment(date(2024, 3, 1));
        payment
            .mark_paid(date(2024, 3, 3), Some("cash".to_string()))
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.paid_date, Some(date(2024, 3, 3)));
        assert_eq!(payment.payment_method.as_deref(), Some("cash"));
    }

    #[test]
    fn mark_paid_works_from_overdue() {
        let mut payment = pending_payment(date(2024, 3, 1));
        payment.mark_overdue().unwrap();
        assert!(payment.mark_paid(date(2024, 3, 10), None).is_ok());
    }

    #[test]
    fn mark_paid_fails_from_cancelled() {
        let mut payment = pending_payment(date(2024, 3, 1));
        payment.cancel().unwrap();
        assert!(payment.mark_paid(date(2024, 3, 10), None).is_err());
    }

    #[test]
    fn cancel_works_from_paid() {
        let mut payment = pending_payment(date(2024, 3, 1));
        payment.mark_paid(date(2024, 3, 1), None).unwrap();
        assert!(payment.cancel().is_ok());
        assert_eq!(payment.status, PaymentStatus::Cancelled);
    }

    #[test]
    fn cancel_twice_fails() {
        let mut payment = pending_payment(date(2024, 3, 1));
        payment.cancel().unwrap();
        assert!(payment.cancel().is_err());
    }

    #[test]
    fn update_with_paid_date_forces_paid_status() {
        let mut payment = pending_payment(date(2024, 3, 1));
        payment
            .apply_update(PaymentUpdate {
                paid_date: Some(Some(date(2024, 3, 5))),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.paid_date, Some(date(2024, 3, 5)));
    }

    #[test]
    fn update_clearing_paid_date_rejected_for_settled_payment() {
        let mut payment = pending_payment(date(2024, 3, 1));
        payment.mark_paid(date(2024, 3, 1), None).unwrap();

        let result = payment.apply_update(PaymentUpdate {
            paid_date: Some(None),
            ..Default::default()
        });

        assert!(result.is_err());
        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.paid_date, Some(date(2024, 3, 1)));
    }

    #[test]
    fn update_corrects_paid_date_on_settled_payment() {
        let mut payment = pending_payment(date(2024, 3, 1));
        payment.mark_paid(date(2024, 3, 1), None).unwrap();

        payment
            .apply_update(PaymentUpdate {
                paid_date: Some(Some(date(2024, 3, 2))),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.paid_date, Some(date(2024, 3, 2)));
    }

    #[test]
    fn update_rejected_for_cancelled_payment() {
        let mut payment = pending_payment(date(2024, 3, 1));
        payment.cancel().unwrap();

        let result = payment.apply_update(PaymentUpdate {
            notes: Some(Some("late".to_string())),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn update_rejects_zero_amount() {
        let mut payment = pending_payment(date(2024, 3, 1));
        let result = payment.apply_update(PaymentUpdate {
            amount: Some(Money::from_cents(0).unwrap()),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(payment.amount.as_cents(), 5000);
    }

    #[test]
    fn new_paid_satisfies_paid_date_invariant() {
        let payment = Payment::new_paid(
            PaymentId::new(),
            SubscriptionId::new(),
            date(2024, 3, 1),
            date(2024, 3, 1),
            Money::from_cents(5000).unwrap(),
            Some("transfer".to_string()),
        );
        assert_eq!(payment.status, PaymentStatus::Paid);
        assert!(payment.paid_date.is_some());
    }
}
