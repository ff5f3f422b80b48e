//! # Staff Repository
//!
//! Accounts that act on orders from the shop side. The order service reads
//! the role to decide whether a status change is allowed.

use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use atelier_core::StaffMember;

#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StaffRepository { pool }
    }

    /// Reads a staff member on any executor.
    pub async fn fetch<'e, E>(executor: E, id: &str) -> DbResult<Option<StaffMember>>
    where
        E: SqliteExecutor<'e>,
    {
        let member = sqlx::query_as::<_, StaffMember>(
            "SELECT id, display_name, role, created_at FROM staff WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(member)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<StaffMember>> {
        Self::fetch(&self.pool, id).await
    }

    pub async fn insert(&self, member: &StaffMember) -> DbResult<StaffMember> {
        debug!(id = %member.id, role = ?member.role, "Inserting staff member");

        sqlx::query(
            "INSERT INTO staff (id, display_name, role, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&member.id)
        .bind(&member.display_name)
        .bind(member.role)
        .bind(member.created_at)
        .execute(&self.pool)
        .await?;

        Ok(member.clone())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

pub fn generate_staff_id() -> String {
    Uuid::new_v4().to_string()
}
