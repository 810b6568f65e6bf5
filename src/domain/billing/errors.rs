//! Billing-specific error types.
//!
//! Errors for plan, subscription, and payment operations.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | PlanNotFound | 404 |
//! | SubscriptionNotFound | 404 |
//! | PaymentNotFound | 404 |
//! | PlanInactive | 400 |
//! | HasPayments | 409 |
//! | InvalidState | 409 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{
    DomainError, ErrorCode, PaymentId, PlanId, SubscriptionId, ValidationError,
};

/// Billing-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingError {
    /// Plan was not found (or belongs to another trainer).
    PlanNotFound(PlanId),

    /// Subscription was not found (or is outside the trainer's scope).
    SubscriptionNotFound(SubscriptionId),

    /// Payment was not found.
    PaymentNotFound(PaymentId),

    /// Plan exists but is retired; no new subscriptions allowed.
    PlanInactive(PlanId),

    /// Subscription still owns payments and cannot be deleted.
    HasPayments(SubscriptionId),

    /// Invalid lifecycle state for the requested operation.
    InvalidState {
        current: String,
        attempted: String,
    },

    /// Validation failed.
    ValidationFailed {
        field: String,
        message: String,
    },

    /// Infrastructure error.
    Infrastructure(String),
}

impl BillingError {
    // Constructor functions for cleaner error creation

    pub fn plan_not_found(id: PlanId) -> Self {
        BillingError::PlanNotFound(id)
    }

    pub fn subscription_not_found(id: SubscriptionId) -> Self {
        BillingError::SubscriptionNotFound(id)
    }

    pub fn payment_not_found(id: PaymentId) -> Self {
        BillingError::PaymentNotFound(id)
    }

    pub fn plan_inactive(id: PlanId) -> Self {
        BillingError::PlanInactive(id)
    }

    pub fn has_payments(id: SubscriptionId) -> Self {
        BillingError::HasPayments(id)
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        BillingError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BillingError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        BillingError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BillingError::PlanNotFound(_) => ErrorCode::PlanNotFound,
            BillingError::SubscriptionNotFound(_) => ErrorCode::SubscriptionNotFound,
            BillingError::PaymentNotFound(_) => ErrorCode::PaymentNotFound,
            BillingError::PlanInactive(_) => ErrorCode::PlanInactive,
            BillingError::HasPayments(_) => ErrorCode::HasPayments,
            BillingError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            BillingError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            BillingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            BillingError::PlanNotFound(id) => format!("Payment plan not found: {}", id),
            BillingError::SubscriptionNotFound(id) => {
                format!("Subscription not found: {}", id)
            }
            BillingError::PaymentNotFound(id) => format!("Payment not found: {}", id),
            BillingError::PlanInactive(id) => {
                format!("Payment plan {} is inactive", id)
            }
            BillingError::HasPayments(id) => {
                format!(
                    "Subscription {} has payments; delete them before removing the subscription",
                    id
                )
            }
            BillingError::InvalidState { current, attempted } => {
                format!("Cannot {} payment in {} state", attempted, current)
            }
            BillingError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            BillingError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BillingError::Infrastructure(_))
    }
}

impl std::fmt::Display for BillingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for BillingError {}

impl From<ValidationError> for BillingError {
    fn from(err: ValidationError) -> Self {
        BillingError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

/// Pulls the entity id a repository recorded under the `id` detail key.
///
/// Falls back to the nil uuid when the detail is absent so conversion
/// stays total; the error message still carries whatever the adapter
/// reported.
fn detail_id(err: &DomainError) -> uuid::Uuid {
    err.details
        .get("id")
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default()
}

impl From<DomainError> for BillingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::PlanNotFound => {
                BillingError::PlanNotFound(PlanId::from_uuid(detail_id(&err)))
            }
            ErrorCode::SubscriptionNotFound => {
                BillingError::SubscriptionNotFound(SubscriptionId::from_uuid(detail_id(&err)))
            }
            ErrorCode::PaymentNotFound => {
                BillingError::PaymentNotFound(PaymentId::from_uuid(detail_id(&err)))
            }
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::NotPositive
            | ErrorCode::InvalidFormat
            | ErrorCode::InvalidDateRange => BillingError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => BillingError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_match_variants() {
        assert_eq!(
            BillingError::plan_not_found(PlanId::new()).code(),
            ErrorCode::PlanNotFound
        );
        assert_eq!(
            BillingError::has_payments(SubscriptionId::new()).code(),
            ErrorCode::HasPayments
        );
        assert_eq!(
            BillingError::validation("price", "must be positive").code(),
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn validation_error_converts_with_field() {
        let err: BillingError = ValidationError::empty_field("name").into();
        match err {
            BillingError::ValidationFailed { field, .. } => assert_eq!(field, "name"),
            other => panic!("expected ValidationFailed, got {:?}", other),
        }
    }

    #[test]
    fn repository_not_found_converts_to_typed_variant() {
        let id = SubscriptionId::new();
        let err: BillingError = DomainError::new(
            ErrorCode::SubscriptionNotFound,
            format!("Subscription not found: {}", id),
        )
        .with_detail("id", id.to_string())
        .into();

        assert_eq!(err, BillingError::SubscriptionNotFound(id));
    }

    #[test]
    fn not_found_without_id_detail_still_maps_to_not_found() {
        let err: BillingError =
            DomainError::new(ErrorCode::PaymentNotFound, "Payment not found").into();

        assert_eq!(err.code(), ErrorCode::PaymentNotFound);
        assert!(matches!(err, BillingError::PaymentNotFound(_)));
    }

    #[test]
    fn only_infrastructure_is_retryable() {
        assert!(BillingError::infrastructure("db down").is_retryable());
        assert!(!BillingError::payment_not_found(PaymentId::new()).is_retryable());
    }

    #[test]
    fn display_includes_identifiers() {
        let id = SubscriptionId::new();
        let msg = BillingError::subscription_not_found(id).to_string();
        assert!(msg.contains(&id.to_string()));
    }
}
