//! Axum router configuration for billing endpoints.
//!
//! This module defines the route structure for the billing API
//! and wires each route to its corresponding handler.

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{
    cancel_payment, create_payment, create_plan, create_subscription, delete_payment,
    delete_subscription, generate_payments, get_billing_stats, get_subscription, list_payments,
    list_plans, list_subscriptions, mark_payment_paid, sweep_payments, toggle_plan,
    toggle_subscription, update_payment, update_plan, update_subscription, BillingAppState,
};

/// Create the payment plan router.
///
/// # Routes
/// - `GET /` - List the trainer's plans
/// - `POST /` - Create a plan
/// - `PATCH /:id` - Update a plan
/// - `POST /:id/toggle` - Retire or reactivate a plan
pub fn plan_routes() -> Router<BillingAppState> {
    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route("/:id", patch(update_plan))
        .route("/:id/toggle", post(toggle_plan))
}

/// Create the subscription router, including nested payment routes.
///
/// # Routes
/// - `GET /` - List the trainer's subscriptions
/// - `POST /` - Subscribe a client to a plan
/// - `GET /:id` - Subscription details with plan and client contact
/// - `PATCH /:id` - Update dates or notes
/// - `DELETE /:id` - Delete (refused while payments exist)
/// - `POST /:id/toggle` - Pause or resume
/// - `GET /:id/payments` - List payments (refreshes overdue statuses)
/// - `POST /:id/payments` - Record a payment by hand
/// - `POST /:id/payments/generate` - Generate the next scheduled batch
pub fn subscription_routes() -> Router<BillingAppState> {
    Router::new()
        .route("/", get(list_subscriptions).post(create_subscription))
        .route(
            "/:id",
            get(get_subscription)
                .patch(update_subscription)
                .delete(delete_subscription),
        )
        .route("/:id/toggle", post(toggle_subscription))
        .route("/:id/payments", get(list_payments).post(create_payment))
        .route("/:id/payments/generate", post(generate_payments))
}

/// Create the payment lifecycle router.
///
/// Payments are addressed by id alone here; subscription-scoped payment
/// routes live under the subscription router.
///
/// # Routes
/// - `PATCH /:id` - Edit a payment's fields
/// - `DELETE /:id` - Delete a payment record
/// - `POST /:id/pay` - Settle a payment
/// - `POST /:id/cancel` - Cancel a payment
/// - `POST /sweep` - Mark past-due pending payments overdue
pub fn payment_routes() -> Router<BillingAppState> {
    Router::new()
        .route("/:id", patch(update_payment).delete(delete_payment))
        .route("/:id/pay", post(mark_payment_paid))
        .route("/:id/cancel", post(cancel_payment))
        .route("/sweep", post(sweep_payments))
}

/// Create the statistics router.
///
/// # Routes
/// - `GET /` - Billing statistics, optionally narrowed with `?subscription_id=`
pub fn stats_routes() -> Router<BillingAppState> {
    Router::new().route("/", get(get_billing_stats))
}

/// Create the complete billing API router.
pub fn billing_routes() -> Router<BillingAppState> {
    Router::new()
        .nest("/plans", plan_routes())
        .nest("/subscriptions", subscription_routes())
        .nest("/payments", payment_routes())
        .nest("/stats", stats_routes())
}
