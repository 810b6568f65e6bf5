//! PostgreSQL implementation of PlanRepository.

use crate::domain::billing::PaymentPlan;
use crate::domain::foundation::{
    DomainError, ErrorCode, Money, PlanId, Timestamp, TrainerId,
};
use crate::ports::PlanRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the PlanRepository port.
///
/// Uses sqlx for type-safe database operations with connection pooling.
pub struct PostgresPlanRepository {
    pool: PgPool,
}

impl PostgresPlanRepository {
    /// Creates a new PostgresPlanRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a payment plan.
#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    description: Option<String>,
    price_cents: i64,
    billing_interval_days: i32,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PlanRow> for PaymentPlan {
    type Error = DomainError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        let price = Money::from_cents(row.price_cents).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid stored price: {}", e),
            )
        })?;

        Ok(PaymentPlan {
            id: PlanId::from_uuid(row.id),
            owner_id: TrainerId::from_uuid(row.owner_id),
            name: row.name,
            description: row.description,
            price,
            billing_interval_days: row.billing_interval_days,
            active: row.active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl PlanRepository for PostgresPlanRepository {
    async fn save(&self, plan: &PaymentPlan) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payment_plans (
                id, owner_id, name, description, price_cents,
                billing_interval_days, active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(plan.id.as_uuid())
        .bind(plan.owner_id.as_uuid())
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.price.as_cents())
        .bind(plan.billing_interval_days)
        .bind(plan.active)
        .bind(plan.created_at.as_datetime())
        .bind(plan.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save plan: {}", e))
        })?;

        Ok(())
    }

    async fn update(&self, plan: &PaymentPlan) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payment_plans SET
                name = $2,
                description = $3,
                price_cents = $4,
                billing_interval_days = $5,
                active = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(plan.id.as_uuid())
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.price.as_cents())
        .bind(plan.billing_interval_days)
        .bind(plan.active)
        .bind(plan.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to update plan: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::PlanNotFound, "Plan not found")
                .with_detail("id", plan.id.to_string()));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &PlanId) -> Result<Option<PaymentPlan>, DomainError> {
        let row: Option<PlanRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, name, description, price_cents,
                   billing_interval_days, active, created_at, updated_at
            FROM payment_plans
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find plan: {}", e))
        })?;

        row.map(PaymentPlan::try_from).transpose()
    }

    async fn list_by_owner(
        &self,
        owner_id: &TrainerId,
    ) -> Result<Vec<PaymentPlan>, DomainError> {
        let rows: Vec<PlanRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, name, description, price_cents,
                   billing_interval_days, active, created_at, updated_at
            FROM payment_plans
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to list plans: {}", e))
        })?;

        rows.into_iter().map(PaymentPlan::try_from).collect()
    }
}
