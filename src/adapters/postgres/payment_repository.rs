//! PostgreSQL implementation of PaymentRepository.

use crate::domain::billing::{Payment, PaymentStatus};
use crate::domain::foundation::{
    DomainError, ErrorCode, Money, PaymentId, SubscriptionId, Timestamp,
};
use crate::ports::PaymentRepository;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the PaymentRepository port.
pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    /// Creates a new PostgresPaymentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a payment.
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    subscription_id: Uuid,
    scheduled_date: NaiveDate,
    paid_date: Option<NaiveDate>,
    amount_cents: i64,
    status: String,
    payment_method: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let status = parse_status(&row.status)?;
        let amount = Money::from_cents(row.amount_cents).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid stored amount: {}", e),
            )
        })?;

        Ok(Payment {
            id: PaymentId::from_uuid(row.id),
            subscription_id: SubscriptionId::from_uuid(row.subscription_id),
            scheduled_date: row.scheduled_date,
            paid_date: row.paid_date,
            amount,
            status,
            payment_method: row.payment_method,
            notes: row.notes,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_status(s: &str) -> Result<PaymentStatus, DomainError> {
    match s.to_lowercase().as_str() {
        "pending" => Ok(PaymentStatus::Pending),
        "paid" => Ok(PaymentStatus::Paid),
        "overdue" => Ok(PaymentStatus::Overdue),
        "cancelled" => Ok(PaymentStatus::Cancelled),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid status value: {}", s),
        )),
    }
}

fn status_to_string(status: &PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "pending",
        PaymentStatus::Paid => "paid",
        PaymentStatus::Overdue => "overdue",
        PaymentStatus::Cancelled => "cancelled",
    }
}

const INSERT_PAYMENT: &str = r#"
    INSERT INTO payments (
        id, subscription_id, scheduled_date, paid_date, amount_cents,
        status, payment_method, notes, created_at, updated_at
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
"#;

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn save(&self, payment: &Payment) -> Result<(), DomainError> {
        sqlx::query(INSERT_PAYMENT)
            .bind(payment.id.as_uuid())
            .bind(payment.subscription_id.as_uuid())
            .bind(payment.scheduled_date)
            .bind(payment.paid_date)
            .bind(payment.amount.as_cents())
            .bind(status_to_string(&payment.status))
            .bind(&payment.payment_method)
            .bind(&payment.notes)
            .bind(payment.created_at.as_datetime())
            .bind(payment.updated_at.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to save payment: {}", e),
                )
            })?;

        Ok(())
    }

    async fn save_batch(&self, payments: &[Payment]) -> Result<(), DomainError> {
        // All rows in one transaction: a failure mid-batch rolls back
        // everything, so no partial schedule is left behind.
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        for payment in payments {
            sqlx::query(INSERT_PAYMENT)
                .bind(payment.id.as_uuid())
                .bind(payment.subscription_id.as_uuid())
                .bind(payment.scheduled_date)
                .bind(payment.paid_date)
                .bind(payment.amount.as_cents())
                .bind(status_to_string(&payment.status))
                .bind(&payment.payment_method)
                .bind(&payment.notes)
                .bind(payment.created_at.as_datetime())
                .bind(payment.updated_at.as_datetime())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to save payment batch: {}", e),
                    )
                })?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit payment batch: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payments SET
                scheduled_date = $2,
                paid_date = $3,
                amount_cents = $4,
                status = $5,
                payment_method = $6,
                notes = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.scheduled_date)
        .bind(payment.paid_date)
        .bind(payment.amount.as_cents())
        .bind(status_to_string(&payment.status))
        .bind(&payment.payment_method)
        .bind(&payment.notes)
        .bind(payment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update payment: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::PaymentNotFound,
                "Payment not found",
            )
            .with_detail("id", payment.id.to_string()));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(
            r#"
            SELECT id, subscription_id, scheduled_date, paid_date, amount_cents,
                   status, payment_method, notes, created_at, updated_at
            FROM payments
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find payment: {}", e),
            )
        })?;

        row.map(Payment::try_from).transpose()
    }

    async fn list_by_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Vec<Payment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(
            r#"
            SELECT id, subscription_id, scheduled_date, paid_date, amount_cents,
                   status, payment_method, notes, created_at, updated_at
            FROM payments
            WHERE subscription_id = $1
            ORDER BY scheduled_date ASC
            "#,
        )
        .bind(subscription_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list payments: {}", e),
            )
        })?;

        rows.into_iter().map(Payment::try_from).collect()
    }

    async fn count_by_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<i64, DomainError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE subscription_id = $1")
                .bind(subscription_id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to count payments: {}", e),
                    )
                })?;

        Ok(count)
    }

    async fn latest_scheduled(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Option<NaiveDate>, DomainError> {
        let latest: Option<NaiveDate> = sqlx::query_scalar(
            "SELECT MAX(scheduled_date) FROM payments WHERE subscription_id = $1",
        )
        .bind(subscription_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to read latest scheduled date: {}", e),
            )
        })?;

        Ok(latest)
    }

    async fn list_pending_due_before(
        &self,
        subscription_ids: &[SubscriptionId],
        today: NaiveDate,
    ) -> Result<Vec<Payment>, DomainError> {
        let ids: Vec<Uuid> = subscription_ids.iter().map(|id| *id.as_uuid()).collect();

        let rows: Vec<PaymentRow> = sqlx::query_as(
            r#"
            SELECT id, subscription_id, scheduled_date, paid_date, amount_cents,
                   status, payment_method, notes, created_at, updated_at
            FROM payments
            WHERE subscription_id = ANY($1)
              AND status = 'pending'
              AND scheduled_date < $2
            "#,
        )
        .bind(&ids)
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list due payments: {}", e),
            )
        })?;

        rows.into_iter().map(Payment::try_from).collect()
    }

    async fn mark_overdue_if_pending(&self, id: &PaymentId) -> Result<bool, DomainError> {
        // Conditional on status so concurrent sweeps converge.
        let result = sqlx::query(
            r#"
            UPDATE payments SET
                status = 'overdue',
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to mark payment overdue: {}", e),
            )
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &PaymentId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete payment: {}", e),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::PaymentNotFound,
                "Payment not found",
            )
            .with_detail("id", id.to_string()));
        }

        Ok(())
    }
}
