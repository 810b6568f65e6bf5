//! Subscription aggregate entity.
//!
//! A subscription enrolls a client in a payment plan for a date range.
//! It is the anchor for generated payments: scheduling walks forward
//! from the subscription start date in plan-interval steps.

use crate::domain::foundation::{
    ClientId, PlanId, SubscriptionId, Timestamp, ValidationError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Subscription aggregate - a client enrolled in a plan.
///
/// # Invariants
///
/// - `end_date`, when present, is not before `start_date`
/// - `plan_id` references a plan that was active at creation time
///   (enforced by the create handler, not here)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identifier for this subscription.
    pub id: SubscriptionId,

    /// Plan providing the pricing terms.
    pub plan_id: PlanId,

    /// Client being billed.
    pub client_id: ClientId,

    /// First day of the billing relationship.
    pub start_date: NaiveDate,

    /// Optional last day. Open-ended when `None`.
    pub end_date: Option<NaiveDate>,

    /// Free-form notes visible to the trainer.
    pub notes: Option<String>,

    /// Whether new payments may be generated for this subscription.
    pub active: bool,

    /// When the subscription was created.
    pub created_at: Timestamp,

    /// When the subscription was last updated.
    pub updated_at: Timestamp,
}

/// Partial update to a subscription. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionUpdate {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
}

impl Subscription {
    /// Create a new active subscription.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if `end_date` precedes `start_date`.
    pub fn new(
        id: SubscriptionId,
        plan_id: PlanId,
        client_id: ClientId,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Result<Self, ValidationError> {
        Self::validate_date_range(start_date, end_date)?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            plan_id,
            client_id,
            start_date,
            end_date,
            notes,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update, re-checking the date range afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the resulting range is inverted.
    pub fn apply_update(&mut self, update: SubscriptionUpdate) -> Result<(), ValidationError> {
        let start = update.start_date.unwrap_or(self.start_date);
        let end = update.end_date.unwrap_or(self.end_date);
        Self::validate_date_range(start, end)?;

        self.start_date = start;
        self.end_date = end;
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Flip the active flag.
    ///
    /// Pausing never touches payments already generated.
    pub fn toggle_active(&mut self) {
        self.active = !self.active;
        self.updated_at = Timestamp::now();
    }

    fn validate_date_range(
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<(), ValidationError> {
        if let Some(end) = end {
            if end < start {
                return Err(ValidationError::invalid_format(
                    "end_date",
                    format!("end date {} is before start date {}", end, start),
                ));
            }
        }
        Ok(())
    }
}
