//! PostgreSQL implementation of SubscriptionRepository.

use crate::domain::billing::Subscription;
use crate::domain::foundation::{
    ClientId, DomainError, ErrorCode, PlanId, SubscriptionId, Timestamp, TrainerId,
};
use crate::ports::SubscriptionRepository;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the SubscriptionRepository port.
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    /// Creates a new PostgresSubscriptionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    plan_id: Uuid,
    client_id: Uuid,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    notes: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Subscription {
            id: SubscriptionId::from_uuid(row.id),
            plan_id: PlanId::from_uuid(row.plan_id),
            client_id: ClientId::from_uuid(row.client_id),
            start_date: row.start_date,
            end_date: row.end_date,
            notes: row.notes,
            active: row.active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, plan_id, client_id, start_date, end_date,
                notes, active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.plan_id.as_uuid())
        .bind(subscription.client_id.as_uuid())
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .bind(&subscription.notes)
        .bind(subscription.active)
        .bind(subscription.created_at.as_datetime())
        .bind(subscription.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save subscription: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET
                start_date = $2,
                end_date = $3,
                notes = $4,
                active = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .bind(&subscription.notes)
        .bind(subscription.active)
        .bind(subscription.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update subscription: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                "Subscription not found",
            )
            .with_detail("id", subscription.id.to_string()));
        }

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT id, plan_id, client_id, start_date, end_date,
                   notes, active, created_at, updated_at
            FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find subscription: {}", e),
            )
        })?;

        Ok(row.map(Subscription::from))
    }

    async fn list_by_trainer(
        &self,
        trainer_id: &TrainerId,
    ) -> Result<Vec<Subscription>, DomainError> {
        let rows: Vec<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT s.id, s.plan_id, s.client_id, s.start_date, s.end_date,
                   s.notes, s.active, s.created_at, s.updated_at
            FROM subscriptions s
            JOIN payment_plans p ON p.id = s.plan_id
            WHERE p.owner_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(trainer_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list subscriptions: {}", e),
            )
        })?;

        Ok(rows.into_iter().map(Subscription::from).collect())
    }

    async fn delete(&self, id: &SubscriptionId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete subscription: {}", e),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                "Subscription not found",
            )
            .with_detail("id", id.to_string()));
        }

        Ok(())
    }
}
