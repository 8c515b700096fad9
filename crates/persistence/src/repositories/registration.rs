//! Repository for registration database operations.

use domain::models::pass::{generate_pass_id, pass_qr_payload};
use domain::models::registration::{PaymentMethod, RegistrationStatus};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::RegistrationEntity;

/// Bounded attempts for pass-ID generation when the unique index reports a
/// collision. The generator's collision odds are tiny; more than a couple of
/// retries means something else is wrong.
const MAX_PASS_ID_ATTEMPTS: u32 = 5;

/// Validated input for inserting a registration.
#[derive(Debug, Clone)]
pub struct NewRegistration<'a> {
    pub name: &'a str,
    pub home_club: &'a str,
    pub designation: &'a str,
    pub phone_number: &'a str,
    pub payment_method: PaymentMethod,
    pub payment_screenshot: Option<Uuid>,
}

/// Repository for registration operations.
#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    /// Creates a new registration repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new pending registration, generating its pass ID and QR
    /// payload.
    ///
    /// The pass ID carries only statistical uniqueness, so the unique index
    /// is the hard guarantee: on a collision the insert is retried with a
    /// freshly generated ID, up to [`MAX_PASS_ID_ATTEMPTS`] times.
    pub async fn create(
        &self,
        input: &NewRegistration<'_>,
        pass_prefix: &str,
        event_name: &str,
    ) -> Result<RegistrationEntity, sqlx::Error> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let created_at = chrono::Utc::now();
            let pass_id = generate_pass_id(pass_prefix);
            let qr_code = pass_qr_payload(&pass_id, input.name, event_name, created_at);

            let result = sqlx::query_as::<_, RegistrationEntity>(
                r#"
                INSERT INTO registrations
                    (name, home_club, designation, phone_number, payment_method,
                     payment_screenshot, pass_id, qr_code, created_at, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING id, name, home_club, designation, phone_number, payment_method,
                          payment_screenshot, pass_id, qr_code, created_at, status
                "#,
            )
            .bind(input.name)
            .bind(input.home_club)
            .bind(input.designation)
            .bind(input.phone_number)
            .bind(input.payment_method)
            .bind(input.payment_screenshot)
            .bind(&pass_id)
            .bind(&qr_code)
            .bind(created_at)
            .bind(RegistrationStatus::Pending)
            .fetch_one(&self.pool)
            .await;

            match result {
                Ok(entity) => return Ok(entity),
                Err(err) if is_pass_id_collision(&err) && attempt < MAX_PASS_ID_ATTEMPTS => {
                    tracing::warn!(
                        pass_id = %pass_id,
                        attempt,
                        "Pass ID collision, regenerating"
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Full listing, newest first, with a deterministic id tie-break for
    /// registrations created in the same instant.
    pub async fn list(&self) -> Result<Vec<RegistrationEntity>, sqlx::Error> {
        sqlx::query_as::<_, RegistrationEntity>(
            r#"
            SELECT id, name, home_club, designation, phone_number, payment_method,
                   payment_screenshot, pass_id, qr_code, created_at, status
            FROM registrations
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Finds a registration by its internal id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RegistrationEntity>, sqlx::Error> {
        sqlx::query_as::<_, RegistrationEntity>(
            r#"
            SELECT id, name, home_club, designation, phone_number, payment_method,
                   payment_screenshot, pass_id, qr_code, created_at, status
            FROM registrations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Finds a registration by its pass ID.
    pub async fn find_by_pass_id(
        &self,
        pass_id: &str,
    ) -> Result<Option<RegistrationEntity>, sqlx::Error> {
        sqlx::query_as::<_, RegistrationEntity>(
            r#"
            SELECT id, name, home_club, designation, phone_number, payment_method,
                   payment_screenshot, pass_id, qr_code, created_at, status
            FROM registrations
            WHERE pass_id = $1
            "#,
        )
        .bind(pass_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Overwrites the moderation status.
    ///
    /// Returns `None` when the id does not exist (deleted concurrently or
    /// never created); the caller maps that to NotFound.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: RegistrationStatus,
    ) -> Result<Option<RegistrationEntity>, sqlx::Error> {
        sqlx::query_as::<_, RegistrationEntity>(
            r#"
            UPDATE registrations
            SET status = $2
            WHERE id = $1
            RETURNING id, name, home_club, designation, phone_number, payment_method,
                      payment_screenshot, pass_id, qr_code, created_at, status
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
    }

    /// Permanently removes a registration.
    ///
    /// Returns true if a row was deleted. Deleting a missing id is not an
    /// error; the delete operation is idempotent.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM registrations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// True when the error is the unique-index violation on pass_id.
fn is_pass_id_collision(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some("registrations_pass_id_key")
        }
        _ => false,
    }
}
