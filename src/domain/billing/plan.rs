//! PaymentPlan aggregate entity.
//!
//! A payment plan is a priced, recurring billing template owned by a
//! trainer. Subscriptions reference a plan for pricing terms.
//!
//! # Design Decisions
//!
//! - **No delete**: plans are retired via `active = false` so historical
//!   subscriptions keep referencing valid pricing terms
//! - **Price snapshot**: changing a plan's price never touches payments
//!   already generated from it
//! - **Money in cents**: all monetary values stored as integer cents

use crate::domain::foundation::{Money, PlanId, Timestamp, TrainerId, ValidationError};
use serde::{Deserialize, Serialize};

/// PaymentPlan aggregate - a priced billing template.
///
/// # Invariants
///
/// - `price` is strictly positive
/// - `billing_interval_days` is strictly positive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPlan {
    /// Unique identifier for this plan.
    pub id: PlanId,

    /// Trainer who owns this plan.
    pub owner_id: TrainerId,

    /// Display name.
    pub name: String,

    /// Optional longer description.
    pub description: Option<String>,

    /// Price per billing interval, in cents.
    pub price: Money,

    /// Days between consecutive payments generated from this plan.
    pub billing_interval_days: i32,

    /// Whether the plan can be attached to new subscriptions.
    pub active: bool,

    /// When the plan was created.
    pub created_at: Timestamp,

    /// When the plan was last updated.
    pub updated_at: Timestamp,
}

/// Partial update to a plan. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PlanUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<Money>,
    pub billing_interval_days: Option<i32>,
}

impl PaymentPlan {
    /// Create a new active plan.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if name is empty, price is not positive,
    /// or the billing interval is not positive.
    pub fn new(
        id: PlanId,
        owner_id: TrainerId,
        name: String,
        description: Option<String>,
        price_cents: i64,
        billing_interval_days: i32,
    ) -> Result<Self, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        let price = Money::positive_from_cents(price_cents)?;
        Self::validate_interval(billing_interval_days)?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            owner_id,
            name,
            description,
            price,
            billing_interval_days,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an empty name or non-positive interval.
    pub fn apply_update(&mut self, update: PlanUpdate) -> Result<(), ValidationError> {
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(ValidationError::empty_field("name"));
            }
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            if price.is_zero() {
                return Err(ValidationError::not_positive("price", 0));
            }
            self.price = price;
        }
        if let Some(interval) = update.billing_interval_days {
            Self::validate_interval(interval)?;
            self.billing_interval_days = interval;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Flip the active flag (soft retirement).
    ///
    /// Does not cascade to existing subscriptions.
    pub fn toggle_active(&mut self) {
        self.active = !self.active;
        self.updated_at = Timestamp::now();
    }

    /// Returns true if the given trainer owns this plan.
    pub fn is_owned_by(&self, trainer_id: &TrainerId) -> bool {
        &self.owner_id == trainer_id
    }

    fn validate_interval(days: i32) -> Result<(), ValidationError> {
        if days <= 0 {
            return Err(ValidationError::not_positive(
                "billing_interval_days",
                days as i64,
            ));
        }
        Ok(())
    }
}
