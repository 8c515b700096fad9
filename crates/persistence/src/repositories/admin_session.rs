//! Repository for admin session database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::AdminSessionEntity;

/// Repository for admin session operations.
#[derive(Clone)]
pub struct AdminSessionRepository {
    pool: PgPool,
}

impl AdminSessionRepository {
    /// Creates a new admin session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stores a new session for the given token hash.
    pub async fn create(
        &self,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<AdminSessionEntity, sqlx::Error> {
        sqlx::query_as::<_, AdminSessionEntity>(
            r#"
            INSERT INTO admin_sessions (token_hash, expires_at)
            VALUES ($1, $2)
            RETURNING id, token_hash, created_at, expires_at
            "#,
        )
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds a live (non-expired) session by token hash.
    pub async fn find_valid(
        &self,
        token_hash: &str,
    ) -> Result<Option<AdminSessionEntity>, sqlx::Error> {
        sqlx::query_as::<_, AdminSessionEntity>(
            r#"
            SELECT id, token_hash, created_at, expires_at
            FROM admin_sessions
            WHERE token_hash = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
    }

    /// Revokes a session by token hash.
    ///
    /// Returns true if a session was deleted.
    pub async fn delete_by_hash(&self, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM admin_sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes expired sessions.
    ///
    /// Called lazily on login so stale rows never accumulate.
    pub async fn delete_expired(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM admin_sessions
            WHERE expires_at <= NOW()
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
