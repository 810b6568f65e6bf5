//! PostgreSQL implementation of BillingReader.
//!
//! Computes dashboard statistics directly in SQL over the subscription
//! scope, matching the reference aggregation in the domain.

use crate::domain::billing::{BillingStatistics, PaymentSummary, DASHBOARD_LIST_CAP, UPCOMING_WINDOW_DAYS};
use crate::domain::foundation::{
    DomainError, ErrorCode, Money, PaymentId, SubscriptionId,
};
use crate::ports::BillingReader;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the BillingReader port.
pub struct PostgresBillingReader {
    pool: PgPool,
}

impl PostgresBillingReader {
    /// Creates a new PostgresBillingReader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: Uuid,
    subscription_id: Uuid,
    scheduled_date: NaiveDate,
    amount_cents: i64,
}

impl TryFrom<SummaryRow> for PaymentSummary {
    type Error = DomainError;

    fn try_from(row: SummaryRow) -> Result<Self, Self::Error> {
        let amount = Money::from_cents(row.amount_cents).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid stored amount: {}", e),
            )
        })?;
        Ok(PaymentSummary {
            payment_id: PaymentId::from_uuid(row.id),
            subscription_id: SubscriptionId::from_uuid(row.subscription_id),
            scheduled_date: row.scheduled_date,
            amount,
        })
    }
}

#[async_trait]
impl BillingReader for PostgresBillingReader {
    async fn statistics(
        &self,
        subscription_ids: &[SubscriptionId],
        today: NaiveDate,
    ) -> Result<BillingStatistics, DomainError> {
        if subscription_ids.is_empty() {
            return Ok(BillingStatistics::empty());
        }

        let ids: Vec<Uuid> = subscription_ids.iter().map(|id| *id.as_uuid()).collect();
        let window_end = today
            .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MAX);

        let (pending_count, overdue_count): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE status = 'pending'),
                   COUNT(*) FILTER (WHERE status = 'overdue')
            FROM payments
            WHERE subscription_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to count payments: {}", e),
            )
        })?;

        let upcoming_rows: Vec<SummaryRow> = sqlx::query_as(
            r#"
            SELECT id, subscription_id, scheduled_date, amount_cents
            FROM payments
            WHERE subscription_id = ANY($1)
              AND status = 'pending'
              AND scheduled_date > $2
              AND scheduled_date <= $3
            ORDER BY scheduled_date ASC
            LIMIT $4
            "#,
        )
        .bind(&ids)
        .bind(today)
        .bind(window_end)
        .bind(DASHBOARD_LIST_CAP as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list upcoming payments: {}", e),
            )
        })?;

        let overdue_rows: Vec<SummaryRow> = sqlx::query_as(
            r#"
            SELECT id, subscription_id, scheduled_date, amount_cents
            FROM payments
            WHERE subscription_id = ANY($1)
              AND status = 'overdue'
            ORDER BY scheduled_date ASC
            LIMIT $2
            "#,
        )
        .bind(&ids)
        .bind(DASHBOARD_LIST_CAP as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list overdue payments: {}", e),
            )
        })?;

        Ok(BillingStatistics {
            pending_count,
            overdue_count,
            upcoming: upcoming_rows
                .into_iter()
                .map(PaymentSummary::try_from)
                .collect::<Result<_, _>>()?,
            overdue: overdue_rows
                .into_iter()
                .map(PaymentSummary::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}
