//! HTTP handlers for billing endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use uuid::Uuid;

use crate::application::handlers::payment::{
    CancelPaymentCommand, CancelPaymentHandler, CreatePaymentCommand, CreatePaymentHandler,
    DeletePaymentCommand, DeletePaymentHandler, GeneratePaymentsCommand, GeneratePaymentsHandler,
    GetBillingStatsHandler, GetBillingStatsQuery, ListPaymentsHandler, ListPaymentsQuery,
    MarkPaymentPaidCommand, MarkPaymentPaidHandler, SweepOverdueCommand, SweepOverdueHandler,
    UpdatePaymentCommand, UpdatePaymentHandler,
};
use crate::application::handlers::plan::{
    CreatePlanCommand, CreatePlanHandler, ListPlansHandler, ListPlansQuery, TogglePlanCommand,
    TogglePlanHandler, UpdatePlanCommand, UpdatePlanHandler,
};
use crate::application::handlers::subscription::{
    CreateSubscriptionCommand, CreateSubscriptionHandler, DeleteSubscriptionCommand,
    DeleteSubscriptionHandler, GetSubscriptionHandler, GetSubscriptionQuery,
    ListSubscriptionsHandler, ListSubscriptionsQuery, ToggleSubscriptionCommand,
    ToggleSubscriptionHandler, UpdateSubscriptionCommand, UpdateSubscriptionHandler,
};
use crate::domain::billing::BillingError;
use crate::domain::foundation::{PaymentId, PlanId, SubscriptionId, TrainerId};
use crate::ports::{
    BillingReader, ClientDirectory, PaymentRepository, PlanRepository, SubscriptionRepository,
};

use super::dto::{
    BillingStatsResponse, CreatePaymentRequest, CreatePlanRequest, CreateSubscriptionRequest,
    ErrorResponse, GeneratePaymentsRequest, MarkPaymentPaidRequest, PaymentListResponse,
    PaymentResponse, PlanListResponse, PlanResponse, StatsParams, SubscriptionDetailResponse,
    SubscriptionListResponse, SubscriptionResponse, SweepResponse, UpdatePaymentRequest,
    UpdatePlanRequest, UpdateSubscriptionRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct BillingAppState {
    pub plan_repository: Arc<dyn PlanRepository>,
    pub subscription_repository: Arc<dyn SubscriptionRepository>,
    pub payment_repository: Arc<dyn PaymentRepository>,
    pub billing_reader: Arc<dyn BillingReader>,
    pub client_directory: Arc<dyn ClientDirectory>,
}

impl BillingAppState {
    /// Create handlers on demand from the shared state.
    pub fn create_plan_handler(&self) -> CreatePlanHandler {
        CreatePlanHandler::new(self.plan_repository.clone())
    }

    pub fn update_plan_handler(&self) -> UpdatePlanHandler {
        UpdatePlanHandler::new(self.plan_repository.clone())
    }

    pub fn toggle_plan_handler(&self) -> TogglePlanHandler {
        TogglePlanHandler::new(self.plan_repository.clone())
    }

    pub fn list_plans_handler(&self) -> ListPlansHandler {
        ListPlansHandler::new(self.plan_repository.clone())
    }

    pub fn create_subscription_handler(&self) -> CreateSubscriptionHandler {
        CreateSubscriptionHandler::new(
            self.subscription_repository.clone(),
            self.plan_repository.clone(),
        )
    }

    pub fn update_subscription_handler(&self) -> UpdateSubscriptionHandler {
        UpdateSubscriptionHandler::new(self.subscription_repository.clone())
    }

    pub fn toggle_subscription_handler(&self) -> ToggleSubscriptionHandler {
        ToggleSubscriptionHandler::new(self.subscription_repository.clone())
    }

    pub fn delete_subscription_handler(&self) -> DeleteSubscriptionHandler {
        DeleteSubscriptionHandler::new(
            self.subscription_repository.clone(),
            self.payment_repository.clone(),
        )
    }

    pub fn get_subscription_handler(&self) -> GetSubscriptionHandler {
        GetSubscriptionHandler::new(
            self.subscription_repository.clone(),
            self.plan_repository.clone(),
            self.client_directory.clone(),
        )
    }

    pub fn list_subscriptions_handler(&self) -> ListSubscriptionsHandler {
        ListSubscriptionsHandler::new(self.subscription_repository.clone())
    }

    pub fn generate_payments_handler(&self) -> GeneratePaymentsHandler {
        GeneratePaymentsHandler::new(
            self.subscription_repository.clone(),
            self.plan_repository.clone(),
            self.payment_repository.clone(),
        )
    }

    pub fn create_payment_handler(&self) -> CreatePaymentHandler {
        CreatePaymentHandler::new(
            self.subscription_repository.clone(),
            self.plan_repository.clone(),
            self.payment_repository.clone(),
        )
    }

    pub fn mark_payment_paid_handler(&self) -> MarkPaymentPaidHandler {
        MarkPaymentPaidHandler::new(self.payment_repository.clone())
    }

    pub fn cancel_payment_handler(&self) -> CancelPaymentHandler {
        CancelPaymentHandler::new(self.payment_repository.clone())
    }

    pub fn update_payment_handler(&self) -> UpdatePaymentHandler {
        UpdatePaymentHandler::new(self.payment_repository.clone())
    }

    pub fn delete_payment_handler(&self) -> DeletePaymentHandler {
        DeletePaymentHandler::new(self.payment_repository.clone())
    }

    pub fn list_payments_handler(&self) -> ListPaymentsHandler {
        ListPaymentsHandler::new(
            self.subscription_repository.clone(),
            self.payment_repository.clone(),
        )
    }

    pub fn sweep_overdue_handler(&self) -> SweepOverdueHandler {
        SweepOverdueHandler::new(self.payment_repository.clone())
    }

    pub fn billing_stats_handler(&self) -> GetBillingStatsHandler {
        GetBillingStatsHandler::new(
            self.subscription_repository.clone(),
            self.payment_repository.clone(),
            self.billing_reader.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Trainer Context (would come from auth middleware in production)
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated trainer context extracted from request.
///
/// In production, this would be extracted from JWT/session by auth middleware.
/// For now, uses a header-based extraction for development/testing.
#[derive(Debug, Clone)]
pub struct AuthenticatedTrainer {
    pub trainer_id: TrainerId,
}

/// Rejection type for AuthenticatedTrainer extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedTrainer
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // In production, this would validate a JWT from the Authorization header
            // For development, we accept an X-Trainer-Id header
            let trainer_id = parts
                .headers
                .get("X-Trainer-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| Uuid::parse_str(s).ok())
                .map(TrainerId::from_uuid)
                .ok_or(AuthenticationRequired)?;

            Ok(AuthenticatedTrainer { trainer_id })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Plan Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/plans - Create a payment plan
pub async fn create_plan(
    State(state): State<BillingAppState>,
    trainer: AuthenticatedTrainer,
    Json(request): Json<CreatePlanRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.create_plan_handler();
    let cmd = CreatePlanCommand {
        trainer_id: trainer.trainer_id,
        name: request.name,
        description: request.description,
        price_cents: request.price_cents,
        billing_interval_days: request.billing_interval_days,
    };

    let plan = handler.handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(PlanResponse::from(plan))))
}

/// GET /api/plans - List the trainer's payment plans
pub async fn list_plans(
    State(state): State<BillingAppState>,
    trainer: AuthenticatedTrainer,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.list_plans_handler();
    let query = ListPlansQuery {
        trainer_id: trainer.trainer_id,
    };

    let plans = handler.handle(query).await?;

    let response = PlanListResponse {
        plans: plans.into_iter().map(PlanResponse::from).collect(),
    };

    Ok(Json(response))
}

/// PATCH /api/plans/:id - Update a payment plan
pub async fn update_plan(
    State(state): State<BillingAppState>,
    trainer: AuthenticatedTrainer,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<UpdatePlanRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.update_plan_handler();
    let cmd = UpdatePlanCommand {
        trainer_id: trainer.trainer_id,
        plan_id: PlanId::from_uuid(plan_id),
        name: request.name,
        description: request.description,
        price_cents: request.price_cents,
        billing_interval_days: request.billing_interval_days,
    };

    let plan = handler.handle(cmd).await?;

    Ok(Json(PlanResponse::from(plan)))
}

/// POST /api/plans/:id/toggle - Retire or reactivate a payment plan
pub async fn toggle_plan(
    State(state): State<BillingAppState>,
    trainer: AuthenticatedTrainer,
    Path(plan_id): Path<Uuid>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.toggle_plan_handler();
    let cmd = TogglePlanCommand {
        trainer_id: trainer.trainer_id,
        plan_id: PlanId::from_uuid(plan_id),
    };

    let plan = handler.handle(cmd).await?;

    Ok(Json(PlanResponse::from(plan)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Subscription Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/subscriptions - Subscribe a client to a plan
pub async fn create_subscription(
    State(state): State<BillingAppState>,
    trainer: AuthenticatedTrainer,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.create_subscription_handler();
    let cmd = CreateSubscriptionCommand {
        trainer_id: trainer.trainer_id,
        client_id: request.client_id,
        plan_id: request.plan_id,
        start_date: request.start_date,
        end_date: request.end_date,
        notes: request.notes,
    };

    let subscription = handler.handle(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse::from(subscription)),
    ))
}

/// GET /api/subscriptions - List the trainer's subscriptions
pub async fn list_subscriptions(
    State(state): State<BillingAppState>,
    trainer: AuthenticatedTrainer,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.list_subscriptions_handler();
    let query = ListSubscriptionsQuery {
        trainer_id: trainer.trainer_id,
    };

    let subscriptions = handler.handle(query).await?;

    let response = SubscriptionListResponse {
        subscriptions: subscriptions
            .into_iter()
            .map(SubscriptionResponse::from)
            .collect(),
    };

    Ok(Json(response))
}

/// GET /api/subscriptions/:id - Get subscription details with plan and client
pub async fn get_subscription(
    State(state): State<BillingAppState>,
    _trainer: AuthenticatedTrainer,
    Path(subscription_id): Path<Uuid>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.get_subscription_handler();
    let query = GetSubscriptionQuery {
        subscription_id: SubscriptionId::from_uuid(subscription_id),
    };

    let view = handler.handle(query).await?;

    Ok(Json(SubscriptionDetailResponse::from(view)))
}

/// PATCH /api/subscriptions/:id - Update subscription dates or notes
pub async fn update_subscription(
    State(state): State<BillingAppState>,
    _trainer: AuthenticatedTrainer,
    Path(subscription_id): Path<Uuid>,
    Json(request): Json<UpdateSubscriptionRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.update_subscription_handler();
    let cmd = UpdateSubscriptionCommand {
        subscription_id: SubscriptionId::from_uuid(subscription_id),
        start_date: request.start_date,
        end_date: request.end_date,
        notes: request.notes,
    };

    let subscription = handler.handle(cmd).await?;

    Ok(Json(SubscriptionResponse::from(subscription)))
}

/// POST /api/subscriptions/:id/toggle - Pause or resume a subscription
pub async fn toggle_subscription(
    State(state): State<BillingAppState>,
    _trainer: AuthenticatedTrainer,
    Path(subscription_id): Path<Uuid>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.toggle_subscription_handler();
    let cmd = ToggleSubscriptionCommand {
        subscription_id: SubscriptionId::from_uuid(subscription_id),
    };

    let subscription = handler.handle(cmd).await?;

    Ok(Json(SubscriptionResponse::from(subscription)))
}

/// DELETE /api/subscriptions/:id - Delete a subscription without payments
pub async fn delete_subscription(
    State(state): State<BillingAppState>,
    _trainer: AuthenticatedTrainer,
    Path(subscription_id): Path<Uuid>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.delete_subscription_handler();
    let cmd = DeleteSubscriptionCommand {
        subscription_id: SubscriptionId::from_uuid(subscription_id),
    };

    handler.handle(cmd).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Payment Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/subscriptions/:id/payments/generate - Generate scheduled payments
pub async fn generate_payments(
    State(state): State<BillingAppState>,
    _trainer: AuthenticatedTrainer,
    Path(subscription_id): Path<Uuid>,
    Json(request): Json<GeneratePaymentsRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.generate_payments_handler();
    let cmd = GeneratePaymentsCommand {
        subscription_id: SubscriptionId::from_uuid(subscription_id),
        count: request.count,
    };

    let payments = handler.handle(cmd).await?;

    let response = PaymentListResponse {
        payments: payments.into_iter().map(PaymentResponse::from).collect(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/subscriptions/:id/payments - Record a payment by hand
pub async fn create_payment(
    State(state): State<BillingAppState>,
    _trainer: AuthenticatedTrainer,
    Path(subscription_id): Path<Uuid>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.create_payment_handler();
    let cmd = CreatePaymentCommand {
        subscription_id: SubscriptionId::from_uuid(subscription_id),
        scheduled_date: request.scheduled_date,
        amount_cents: request.amount_cents,
        paid_date: request.paid_date,
        payment_method: request.payment_method,
    };

    let payment = handler.handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(PaymentResponse::from(payment))))
}

/// GET /api/subscriptions/:id/payments - List a subscription's payments
///
/// Overdue statuses are refreshed against today's date before listing.
pub async fn list_payments(
    State(state): State<BillingAppState>,
    _trainer: AuthenticatedTrainer,
    Path(subscription_id): Path<Uuid>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.list_payments_handler();
    let query = ListPaymentsQuery {
        subscription_id: SubscriptionId::from_uuid(subscription_id),
        today: Utc::now().date_naive(),
    };

    let payments = handler.handle(query).await?;

    let response = PaymentListResponse {
        payments: payments.into_iter().map(PaymentResponse::from).collect(),
    };

    Ok(Json(response))
}

/// POST /api/payments/:id/pay - Settle a payment
pub async fn mark_payment_paid(
    State(state): State<BillingAppState>,
    _trainer: AuthenticatedTrainer,
    Path(payment_id): Path<Uuid>,
    Json(request): Json<MarkPaymentPaidRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.mark_payment_paid_handler();
    let cmd = MarkPaymentPaidCommand {
        payment_id: PaymentId::from_uuid(payment_id),
        paid_date: request.paid_date,
        payment_method: request.payment_method,
    };

    let payment = handler.handle(cmd).await?;

    Ok(Json(PaymentResponse::from(payment)))
}

/// POST /api/payments/:id/cancel - Cancel a payment
pub async fn cancel_payment(
    State(state): State<BillingAppState>,
    _trainer: AuthenticatedTrainer,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.cancel_payment_handler();
    let cmd = CancelPaymentCommand {
        payment_id: PaymentId::from_uuid(payment_id),
    };

    let payment = handler.handle(cmd).await?;

    Ok(Json(PaymentResponse::from(payment)))
}

/// PATCH /api/payments/:id - Edit a payment's fields
pub async fn update_payment(
    State(state): State<BillingAppState>,
    _trainer: AuthenticatedTrainer,
    Path(payment_id): Path<Uuid>,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.update_payment_handler();
    let cmd = UpdatePaymentCommand {
        payment_id: PaymentId::from_uuid(payment_id),
        scheduled_date: request.scheduled_date,
        paid_date: request.paid_date,
        amount_cents: request.amount_cents,
        payment_method: request.payment_method,
        notes: request.notes,
    };

    let payment = handler.handle(cmd).await?;

    Ok(Json(PaymentResponse::from(payment)))
}

/// DELETE /api/payments/:id - Delete a payment record
pub async fn delete_payment(
    State(state): State<BillingAppState>,
    _trainer: AuthenticatedTrainer,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.delete_payment_handler();
    let cmd = DeletePaymentCommand {
        payment_id: PaymentId::from_uuid(payment_id),
    };

    handler.handle(cmd).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/payments/sweep - Mark past-due pending payments overdue
///
/// Sweeps every subscription belonging to the authenticated trainer.
pub async fn sweep_payments(
    State(state): State<BillingAppState>,
    trainer: AuthenticatedTrainer,
) -> Result<impl IntoResponse, BillingApiError> {
    let subscriptions = state
        .subscription_repository
        .list_by_trainer(&trainer.trainer_id)
        .await?;
    let subscription_ids: Vec<SubscriptionId> = subscriptions.iter().map(|s| s.id).collect();

    let handler = state.sweep_overdue_handler();
    let cmd = SweepOverdueCommand {
        subscription_ids,
        today: Utc::now().date_naive(),
    };

    let marked_overdue = handler.handle(cmd).await?;

    Ok(Json(SweepResponse { marked_overdue }))
}

/// GET /api/stats - Billing statistics for the trainer's dashboard
pub async fn get_billing_stats(
    State(state): State<BillingAppState>,
    trainer: AuthenticatedTrainer,
    Query(params): Query<StatsParams>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.billing_stats_handler();
    let query = GetBillingStatsQuery {
        trainer_id: trainer.trainer_id,
        subscription_id: params.subscription_id,
        today: Utc::now().date_naive(),
    };

    let stats = handler.handle(query).await?;

    Ok(Json(BillingStatsResponse::from(stats)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
pub struct BillingApiError(BillingError);

impl From<BillingError> for BillingApiError {
    fn from(err: BillingError) -> Self {
        Self(err)
    }
}

impl From<crate::domain::foundation::DomainError> for BillingApiError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        Self(BillingError::from(err))
    }
}

impl IntoResponse for BillingApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            BillingError::PlanNotFound(_)
            | BillingError::SubscriptionNotFound(_)
            | BillingError::PaymentNotFound(_) => StatusCode::NOT_FOUND,
            BillingError::PlanInactive(_) | BillingError::ValidationFailed { .. } => {
                StatusCode::BAD_REQUEST
            }
            BillingError::HasPayments(_) | BillingError::InvalidState { .. } => {
                StatusCode::CONFLICT
            }
            BillingError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Use the error's built-in code/message methods for consistent wire format
        let body = ErrorResponse::new(self.0.code().to_string(), self.0.message());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PaymentId, PlanId, SubscriptionId};

    fn status_of(err: BillingError) -> StatusCode {
        BillingApiError::from(err).into_response().status()
    }

    #[test]
    fn test_not_found_errors_map_to_404() {
        assert_eq!(
            status_of(BillingError::plan_not_found(PlanId::new())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(BillingError::subscription_not_found(SubscriptionId::new())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(BillingError::payment_not_found(PaymentId::new())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_validation_errors_map_to_400() {
        assert_eq!(
            status_of(BillingError::validation("count", "must be positive")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(BillingError::plan_inactive(PlanId::new())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_conflict_errors_map_to_409() {
        assert_eq!(
            status_of(BillingError::has_payments(SubscriptionId::new())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(BillingError::invalid_state("Cancelled", "pay")),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_infrastructure_errors_map_to_500() {
        assert_eq!(
            status_of(BillingError::infrastructure("connection refused")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
