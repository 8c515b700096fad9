//! Repository for the registration gate singleton.

use domain::models::gate::RegistrationGate;
use sqlx::PgPool;

use crate::entities::GateEntity;

/// Repository for the single-row registration gate.
#[derive(Clone)]
pub struct GateRepository {
    pool: PgPool,
}

impl GateRepository {
    /// Creates a new gate repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reads the gate state.
    ///
    /// The row only exists after the first toggle; before that the gate
    /// reads as the default open state.
    pub async fn get(&self) -> Result<RegistrationGate, sqlx::Error> {
        let row = sqlx::query_as::<_, GateEntity>(
            r#"
            SELECT is_closed, last_updated
            FROM registration_gate
            WHERE id = TRUE
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into).unwrap_or_else(RegistrationGate::default_open))
    }

    /// Sets the gate open or closed, refreshing the toggle timestamp.
    ///
    /// Idempotent: re-closing a closed gate (or re-opening an open one)
    /// succeeds and just refreshes `last_updated`. The singleton row is
    /// created on first use.
    pub async fn set_closed(&self, is_closed: bool) -> Result<RegistrationGate, sqlx::Error> {
        let row = sqlx::query_as::<_, GateEntity>(
            r#"
            INSERT INTO registration_gate (id, is_closed, last_updated)
            VALUES (TRUE, $1, NOW())
            ON CONFLICT (id)
            DO UPDATE SET is_closed = EXCLUDED.is_closed, last_updated = NOW()
            RETURNING is_closed, last_updated
            "#,
        )
        .bind(is_closed)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
