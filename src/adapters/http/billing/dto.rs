//! HTTP DTOs (Data Transfer Objects) for billing endpoints.
//!
//! These types define the JSON request/response structure for the billing API.
//! They serve as the boundary between HTTP and the application layer.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::application::handlers::subscription::SubscriptionView;
use crate::domain::billing::{
    BillingStatistics, Payment, PaymentPlan, PaymentStatus, PaymentSummary, Subscription,
};
use crate::domain::foundation::{ClientId, PaymentId, PlanId, SubscriptionId};
use crate::ports::ClientContact;

/// Distinguishes an absent JSON field (no change) from an explicit
/// `null` (clear the value). Plain `Option<Option<T>>` collapses both
/// to `None` under serde's defaults.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a payment plan.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price in cents, must be positive.
    pub price_cents: i64,
    /// Days between scheduled payments, must be positive.
    pub billing_interval_days: i32,
}

/// Request to update a payment plan. Absent fields are left unchanged;
/// an explicit `null` description clears it.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePlanRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub billing_interval_days: Option<i32>,
}

/// Request to subscribe a client to a plan.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub client_id: ClientId,
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request to update a subscription's dates or notes.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSubscriptionRequest {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

/// Request to generate the next batch of scheduled payments.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratePaymentsRequest {
    pub count: u32,
}

/// Request to record a single payment by hand.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentRequest {
    pub scheduled_date: NaiveDate,
    /// Defaults to the plan price when omitted.
    #[serde(default)]
    pub amount_cents: Option<i64>,
    /// Supplying a paid date records the payment as already settled.
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// Request to settle a payment.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MarkPaymentPaidRequest {
    /// Defaults to today when omitted.
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// Request to edit a payment's fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePaymentRequest {
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub paid_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub amount_cents: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub payment_method: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

/// Query parameters for the statistics endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsParams {
    /// Narrow the statistics to a single subscription.
    #[serde(default)]
    pub subscription_id: Option<SubscriptionId>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Payment plan details.
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub id: PlanId,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub billing_interval_days: i32,
    pub active: bool,
    /// When the plan was created (ISO 8601).
    pub created_at: String,
    /// When the plan was last updated (ISO 8601).
    pub updated_at: String,
}

impl From<PaymentPlan> for PlanResponse {
    fn from(plan: PaymentPlan) -> Self {
        Self {
            id: plan.id,
            name: plan.name,
            description: plan.description,
            price_cents: plan.price.as_cents(),
            billing_interval_days: plan.billing_interval_days,
            active: plan.active,
            created_at: plan.created_at.as_datetime().to_rfc3339(),
            updated_at: plan.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

/// List of payment plans.
#[derive(Debug, Clone, Serialize)]
pub struct PlanListResponse {
    pub plans: Vec<PlanResponse>,
}

/// Subscription details.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub id: SubscriptionId,
    pub plan_id: PlanId,
    pub client_id: ClientId,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id,
            plan_id: subscription.plan_id,
            client_id: subscription.client_id,
            start_date: subscription.start_date,
            end_date: subscription.end_date,
            notes: subscription.notes,
            active: subscription.active,
            created_at: subscription.created_at.as_datetime().to_rfc3339(),
            updated_at: subscription.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

/// List of subscriptions.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionListResponse {
    pub subscriptions: Vec<SubscriptionResponse>,
}

/// Contact card for a subscribed client.
#[derive(Debug, Clone, Serialize)]
pub struct ClientContactResponse {
    pub id: ClientId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<ClientContact> for ClientContactResponse {
    fn from(contact: ClientContact) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
        }
    }
}

/// Subscription detail view joining plan terms and client contact.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionDetailResponse {
    pub subscription: SubscriptionResponse,
    pub plan: PlanResponse,
    /// `null` when the directory has no card for the client.
    pub client: Option<ClientContactResponse>,
}

impl From<SubscriptionView> for SubscriptionDetailResponse {
    fn from(view: SubscriptionView) -> Self {
        Self {
            subscription: SubscriptionResponse::from(view.subscription),
            plan: PlanResponse::from(view.plan),
            client: view.client.map(ClientContactResponse::from),
        }
    }
}

/// Payment details.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub id: PaymentId,
    pub subscription_id: SubscriptionId,
    pub scheduled_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub amount_cents: i64,
    pub status: PaymentStatus,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            subscription_id: payment.subscription_id,
            scheduled_date: payment.scheduled_date,
            paid_date: payment.paid_date,
            amount_cents: payment.amount.as_cents(),
            status: payment.status,
            payment_method: payment.payment_method,
            notes: payment.notes,
            created_at: payment.created_at.as_datetime().to_rfc3339(),
            updated_at: payment.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

/// List of payments, ascending by scheduled date.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentListResponse {
    pub payments: Vec<PaymentResponse>,
}

/// Result of an overdue sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    /// Number of payments newly marked overdue.
    pub marked_overdue: u64,
}

/// Compact payment reference for dashboard lists.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSummaryResponse {
    pub payment_id: PaymentId,
    pub subscription_id: SubscriptionId,
    pub scheduled_date: NaiveDate,
    pub amount_cents: i64,
}

impl From<PaymentSummary> for PaymentSummaryResponse {
    fn from(summary: PaymentSummary) -> Self {
        Self {
            payment_id: summary.payment_id,
            subscription_id: summary.subscription_id,
            scheduled_date: summary.scheduled_date,
            amount_cents: summary.amount.as_cents(),
        }
    }
}

/// Billing statistics for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct BillingStatsResponse {
    pub pending_count: i64,
    pub overdue_count: i64,
    /// Pending payments due within the next week, earliest first.
    pub upcoming: Vec<PaymentSummaryResponse>,
    /// Overdue payments, earliest first.
    pub overdue: Vec<PaymentSummaryResponse>,
}

impl From<BillingStatistics> for BillingStatsResponse {
    fn from(stats: BillingStatistics) -> Self {
        Self {
            pending_count: stats.pending_count,
            overdue_count: stats.overdue_count,
            upcoming: stats.upcoming.into_iter().map(Into::into).collect(),
            overdue: stats.overdue.into_iter().map(Into::into).collect(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response structure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_plan_request_distinguishes_absent_from_null() {
        let absent: UpdatePlanRequest = serde_json::from_str(r#"{"name":"Gold"}"#).unwrap();
        assert_eq!(absent.description, None);

        let cleared: UpdatePlanRequest =
            serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: UpdatePlanRequest =
            serde_json::from_str(r#"{"description":"Four sessions"}"#).unwrap();
        assert_eq!(set.description, Some(Some("Four sessions".to_string())));
    }

    #[test]
    fn test_update_subscription_request_clears_end_date() {
        let request: UpdateSubscriptionRequest =
            serde_json::from_str(r#"{"end_date":null}"#).unwrap();
        assert_eq!(request.end_date, Some(None));
        assert_eq!(request.start_date, None);
        assert_eq!(request.notes, None);
    }

    #[test]
    fn test_mark_paid_request_defaults() {
        let request: MarkPaymentPaidRequest = serde_json::from_str("{}").unwrap();
        assert!(request.paid_date.is_none());
        assert!(request.payment_method.is_none());
    }

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse::new("PLAN_NOT_FOUND", "Payment plan not found");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("PLAN_NOT_FOUND"));
        assert!(!json.contains("details"));
    }
}
