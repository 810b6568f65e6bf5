//! PostgreSQL implementation of ClientDirectory.

use crate::domain::foundation::{ClientId, DomainError, ErrorCode};
use crate::ports::{ClientContact, ClientDirectory};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the ClientDirectory port.
///
/// Reads the platform's `clients` table. The billing engine never
/// writes to it.
pub struct PostgresClientDirectory {
    pool: PgPool,
}

impl PostgresClientDirectory {
    /// Creates a new PostgresClientDirectory with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
}

impl From<ClientRow> for ClientContact {
    fn from(row: ClientRow) -> Self {
        ClientContact {
            id: ClientId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
        }
    }
}

#[async_trait]
impl ClientDirectory for PostgresClientDirectory {
    async fn find_contact(&self, id: &ClientId) -> Result<Option<ClientContact>, DomainError> {
        let row: Option<ClientRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, phone
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to look up client: {}", e),
            )
        })?;

        Ok(row.map(ClientContact::from))
    }
}
