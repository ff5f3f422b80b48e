//! # Client Repository
//!
//! Read access to clients plus the insert used by seeding and tests.
//! Profile management lives outside this engine.

use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use atelier_core::Client;

/// Repository for client records.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Reads a client on any executor.
    pub async fn fetch<'e, E>(executor: E, id: &str) -> DbResult<Option<Client>>
    where
        E: SqliteExecutor<'e>,
    {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, first_name, last_name, patronymic, phone, is_permanent, created_at
            FROM clients
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(client)
    }

    /// Gets a client by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        Self::fetch(&self.pool, id).await
    }

    /// Inserts a client.
    pub async fn insert(&self, client: &Client) -> DbResult<Client> {
        debug!(id = %client.id, is_permanent = client.is_permanent, "Inserting client");

        sqlx::query(
            r#"
            INSERT INTO clients (
                id, first_name, last_name, patronymic, phone, is_permanent, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&client.id)
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.patronymic)
        .bind(&client.phone)
        .bind(client.is_permanent)
        .bind(client.created_at)
        .execute(&self.pool)
        .await?;

        Ok(client.clone())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new client ID.
pub fn generate_client_id() -> String {
    Uuid::new_v4().to_string()
}
