//! Admin login/logout routes.

use axum::{extract::State, http::StatusCode, Extension, Json};
use persistence::repositories::AdminSessionRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AdminAuth;
use domain::models::admin_session::{
    generate_session_token, session_expiry, AdminLoginRequest, AdminLoginResponse,
};
use shared::crypto::sha256_hex;

/// Exchange the shared organizer password for a session token.
///
/// POST /api/v1/admin/login
///
/// The credential is a single shared secret; this is an access gate for the
/// dashboard, not a real security boundary.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    // Compare digests so the check does not depend on password length.
    let presented = sha256_hex(&request.password);
    let expected = sha256_hex(&state.config.security.admin_password);
    if presented != expected {
        tracing::warn!("Admin login failed");
        return Err(ApiError::Unauthorized("Invalid password".to_string()));
    }

    let repo = AdminSessionRepository::new(state.pool.clone());

    // Lazy cleanup keeps the session table from accumulating stale rows.
    let purged = repo.delete_expired().await?;
    if purged > 0 {
        tracing::debug!(purged, "Expired admin sessions removed");
    }

    let token = generate_session_token();
    let expires_at = session_expiry(state.config.security.session_ttl_secs);
    let session = repo.create(&sha256_hex(&token), expires_at).await?;

    tracing::info!(session_id = %session.id, expires_at = %expires_at, "Admin session issued");

    Ok(Json(AdminLoginResponse { token, expires_at }))
}

/// Revoke the presented session.
///
/// POST /api/v1/admin/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
) -> Result<StatusCode, ApiError> {
    let repo = AdminSessionRepository::new(state.pool.clone());
    repo.delete_by_hash(&auth.token_hash).await?;

    tracing::info!(session_id = %auth.session_id, "Admin session revoked");

    Ok(StatusCode::NO_CONTENT)
}
