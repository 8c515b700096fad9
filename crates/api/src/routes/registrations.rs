//! Public registration intake routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use persistence::repositories::{GateRepository, NewRegistration, RegistrationRepository};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_registration_created;
use domain::models::gate::RegistrationGate;
use domain::models::registration::{
    CreateRegistrationRequest, CreateRegistrationResponse, Registration,
};

/// Submit a new registration.
///
/// POST /api/v1/registrations
///
/// Rejected with `registrations_closed` while the gate is closed. On
/// success the attendee gets their registration id and pass ID back.
pub async fn create_registration(
    State(state): State<AppState>,
    Json(request): Json<CreateRegistrationRequest>,
) -> Result<(StatusCode, Json<CreateRegistrationResponse>), ApiError> {
    request.validate()?;

    let gate = GateRepository::new(state.pool.clone()).get().await?;
    if gate.is_closed {
        return Err(ApiError::RegistrationsClosed);
    }

    let repo = RegistrationRepository::new(state.pool.clone());
    let input = NewRegistration {
        name: &request.name,
        home_club: &request.home_club,
        designation: &request.designation,
        phone_number: &request.phone_number,
        payment_method: request.payment_method,
        payment_screenshot: request.payment_screenshot,
    };

    let entity = repo
        .create(
            &input,
            &state.config.event.pass_prefix,
            &state.config.event.name,
        )
        .await?;

    record_registration_created();
    tracing::info!(
        registration_id = %entity.id,
        pass_id = %entity.pass_id,
        payment_method = %entity.payment_method,
        "Registration created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateRegistrationResponse {
            registration_id: entity.id,
            pass_id: entity.pass_id,
        }),
    ))
}

/// Look up a registration by its pass ID (digital pass view).
///
/// GET /api/v1/registrations/pass/:pass_id
pub async fn get_by_pass_id(
    State(state): State<AppState>,
    Path(pass_id): Path<String>,
) -> Result<Json<Registration>, ApiError> {
    let repo = RegistrationRepository::new(state.pool.clone());

    let entity = repo
        .find_by_pass_id(&pass_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Registration not found".to_string()))?;

    Ok(Json(entity.into()))
}

/// Current gate state, read by the intake form before rendering.
///
/// GET /api/v1/registration-status
pub async fn get_registration_status(
    State(state): State<AppState>,
) -> Result<Json<RegistrationGate>, ApiError> {
    let gate = GateRepository::new(state.pool.clone()).get().await?;
    Ok(Json(gate))
}
