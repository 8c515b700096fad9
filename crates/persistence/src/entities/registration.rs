//! Registration entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::registration::{PaymentMethod, Registration, RegistrationStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the registrations table.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationEntity {
    pub id: Uuid,
    pub name: String,
    pub home_club: String,
    pub designation: String,
    pub phone_number: String,
    pub payment_method: PaymentMethod,
    pub payment_screenshot: Option<Uuid>,
    pub pass_id: String,
    pub qr_code: String,
    pub created_at: DateTime<Utc>,
    pub status: RegistrationStatus,
}

impl From<RegistrationEntity> for Registration {
    fn from(row: RegistrationEntity) -> Self {
        Self {
            id: row.id,
            name: row.name,
            home_club: row.home_club,
            designation: row.designation,
            phone_number: row.phone_number,
            payment_method: row.payment_method,
            payment_screenshot: row.payment_screenshot,
            pass_id: row.pass_id,
            qr_code: row.qr_code,
            created_at: row.created_at,
            status: row.status,
        }
    }
}
