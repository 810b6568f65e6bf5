//! Money value object.
//!
//! All monetary values are stored as integer cents (not floats), so the
//! spec's decimal prices are represented exactly.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A non-negative monetary amount in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents, rejecting negative amounts.
    pub fn from_cents(cents: i64) -> Result<Self, ValidationError> {
        if cents < 0 {
            return Err(ValidationError::invalid_format(
                "amount",
                format!("amount cannot be negative, got {}", cents),
            ));
        }
        Ok(Self(cents))
    }

    /// Creates a strictly positive Money value from cents.
    ///
    /// Plan prices must be positive; zero is rejected here.
    pub fn positive_from_cents(cents: i64) -> Result<Self, ValidationError> {
        if cents <= 0 {
            return Err(ValidationError::not_positive("price", cents));
        }
        Ok(Self(cents))
    }

    /// Returns the amount in cents.
    pub fn as_cents(&self) -> i64 {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }
}
