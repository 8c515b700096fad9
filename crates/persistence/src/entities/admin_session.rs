//! Admin session entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::admin_session::AdminSession;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the admin_sessions table.
#[derive(Debug, Clone, FromRow)]
pub struct AdminSessionEntity {
    pub id: Uuid,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<AdminSessionEntity> for AdminSession {
    fn from(row: AdminSessionEntity) -> Self {
        Self {
            id: row.id,
            token_hash: row.token_hash,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}
