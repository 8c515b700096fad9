//! Admin session authentication middleware.
//!
//! Validates the `Authorization: Bearer` session token issued at login and
//! rejects requests without a live session.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use persistence::repositories::AdminSessionRepository;
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;

/// Authenticated admin session info, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub session_id: Uuid,
    /// Hash of the presented token, used for logout.
    pub token_hash: String,
}

/// Middleware for admin-only routes.
///
/// Requires a live (non-expired) admin session token in the Authorization
/// header. Session info is stored in request extensions for downstream
/// handlers.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let token = match token {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => {
            return unauthorized_response("Missing admin session token");
        }
    };

    let token_hash = shared::crypto::sha256_hex(&token);
    let repo = AdminSessionRepository::new(state.pool.clone());

    match repo.find_valid(&token_hash).await {
        Ok(Some(session)) => {
            // find_valid already filters expired rows; the extra check
            // covers clock skew between app and database.
            if session.expires_at <= Utc::now() {
                return unauthorized_response("Admin session expired");
            }
            req.extensions_mut().insert(AdminAuth {
                session_id: session.id,
                token_hash,
            });
            next.run(req).await
        }
        Ok(None) => unauthorized_response("Invalid or expired admin session"),
        Err(err) => {
            tracing::error!("Failed to validate admin session: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An internal error occurred"
                })),
            )
                .into_response()
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}
