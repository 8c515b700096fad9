//! Registration gate entity (single-row table mapping).

use chrono::{DateTime, Utc};
use domain::models::gate::RegistrationGate;
use sqlx::FromRow;

/// Database row mapping for the registration_gate singleton table.
///
/// The row only exists after the first open/close toggle; an absent row
/// reads as the default open gate.
#[derive(Debug, Clone, FromRow)]
pub struct GateEntity {
    pub is_closed: bool,
    pub last_updated: DateTime<Utc>,
}

impl From<GateEntity> for RegistrationGate {
    fn from(row: GateEntity) -> Self {
        Self {
            is_closed: row.is_closed,
            last_updated: Some(row.last_updated),
        }
    }
}
