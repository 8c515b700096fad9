//! Admin moderation routes.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use persistence::repositories::{GateRepository, RegistrationRepository};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_registration_moderated;
use domain::models::registration::{
    ListRegistrationsQuery, Registration, RegistrationStats, RegistrationWithUrl,
    UpdateStatusRequest,
};
use domain::services::moderation::{self, StatusFilter};

/// Moderation listing, newest first, with resolved screenshot URLs.
///
/// GET /api/v1/admin/registrations?search=&status=
///
/// Optional `search` (case-insensitive substring over name, club,
/// designation and pass id) and `status` (`all` or a concrete status)
/// filters run over the listed sequence.
pub async fn list_registrations(
    State(state): State<AppState>,
    Query(query): Query<ListRegistrationsQuery>,
) -> Result<Json<Vec<RegistrationWithUrl>>, ApiError> {
    let status_filter: StatusFilter = query
        .status
        .as_deref()
        .unwrap_or("all")
        .parse()
        .map_err(|e| ApiError::Validation(format!("{}", e)))?;
    let search = query.search.unwrap_or_default();

    let records = fetch_all(&state).await?;
    let filtered = moderation::filter_registrations(&records, &search, status_filter);

    let mut response = Vec::with_capacity(filtered.len());
    for registration in filtered {
        let screenshot_url = resolve_screenshot_url(&state, registration).await;
        response.push(RegistrationWithUrl {
            registration: registration.clone(),
            screenshot_url,
        });
    }

    Ok(Json(response))
}

/// Aggregate moderation counts.
///
/// GET /api/v1/admin/registrations/stats
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<RegistrationStats>, ApiError> {
    let records = fetch_all(&state).await?;
    Ok(Json(moderation::stats(&records)))
}

/// CSV export of the verified subset.
///
/// GET /api/v1/admin/registrations/export
pub async fn export_verified_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let records = fetch_all(&state).await?;
    let csv = moderation::verified_csv(&records);
    let filename = moderation::export_filename(Utc::now());

    tracing::info!(rows = csv.lines().count() - 1, "Verified CSV exported");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Overwrite a registration's moderation status.
///
/// PATCH /api/v1/admin/registrations/:id/status
///
/// Any status may move to any other status, including back to pending.
/// Re-applying the current status is a no-op success.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<StatusCode, ApiError> {
    let repo = RegistrationRepository::new(state.pool.clone());

    let current = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Registration not found".to_string()))?;

    let transition = current.status.transition(request.status);

    // The row can vanish between the read and the write when a concurrent
    // delete races this update; that also reads as NotFound.
    let updated = repo
        .update_status(id, request.status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Registration not found".to_string()))?;

    record_registration_moderated(&updated.status.to_string());
    match transition {
        domain::models::registration::StatusTransition::Unchanged => {
            tracing::info!(
                registration_id = %id,
                status = %updated.status,
                "Status re-applied (no change)"
            );
        }
        domain::models::registration::StatusTransition::Changed { from } => {
            tracing::info!(
                registration_id = %id,
                from = %from,
                to = %updated.status,
                "Status updated"
            );
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Permanently delete a registration.
///
/// DELETE /api/v1/admin/registrations/:id
///
/// Idempotent: deleting an id that no longer exists is a successful no-op.
pub async fn delete_registration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = RegistrationRepository::new(state.pool.clone());
    let removed = repo.delete(id).await?;

    if removed {
        tracing::info!(registration_id = %id, "Registration deleted");
    } else {
        tracing::info!(registration_id = %id, "Delete of missing registration ignored");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Close registrations.
///
/// POST /api/v1/admin/registrations/close
pub async fn close_registrations(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let gate = GateRepository::new(state.pool.clone()).set_closed(true).await?;
    tracing::info!(last_updated = ?gate.last_updated, "Registrations closed");
    Ok(StatusCode::NO_CONTENT)
}

/// Re-open registrations.
///
/// POST /api/v1/admin/registrations/open
pub async fn open_registrations(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let gate = GateRepository::new(state.pool.clone()).set_closed(false).await?;
    tracing::info!(last_updated = ?gate.last_updated, "Registrations opened");
    Ok(StatusCode::NO_CONTENT)
}

/// Lists every registration as domain models, newest first.
async fn fetch_all(state: &AppState) -> Result<Vec<Registration>, ApiError> {
    let repo = RegistrationRepository::new(state.pool.clone());
    let entities = repo.list().await?;
    Ok(entities.into_iter().map(Into::into).collect())
}

/// Resolves the signed screenshot URL for one record.
///
/// Resolution is per-record: a missing blob degrades to a logged warning
/// and no URL, never failing the whole listing.
async fn resolve_screenshot_url(state: &AppState, registration: &Registration) -> Option<String> {
    let attachment_id = registration.payment_screenshot?;

    if state.attachments.exists(attachment_id).await {
        Some(state.attachments.signed_url(attachment_id, Utc::now()))
    } else {
        tracing::warn!(
            registration_id = %registration.id,
            attachment_id = %attachment_id,
            "Payment screenshot missing from storage"
        );
        None
    }
}
