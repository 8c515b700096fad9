//! Payment screenshot upload and retrieval routes.
//!
//! Uploads are two-step: the client first requests a write target, then
//! PUTs the raw bytes to the returned signed URL and passes the resulting
//! storage id into the registration create call. Reads go through signed,
//! time-bounded URLs minted by the moderation listing.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::storage::StorageError;

/// Signature parameters carried on signed upload/read URLs.
#[derive(Debug, Deserialize)]
pub struct SignedUrlQuery {
    pub expires: i64,
    pub sig: String,
}

/// Response for an allocated upload target.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerateUploadResponse {
    pub storage_id: Uuid,
    pub upload_url: String,
}

/// Response after storing uploaded bytes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UploadCompleteResponse {
    pub storage_id: Uuid,
}

/// Allocate a write target for a screenshot upload.
///
/// POST /api/v1/uploads
pub async fn generate_upload_url(
    State(state): State<AppState>,
) -> Result<Json<GenerateUploadResponse>, ApiError> {
    let storage_id = state.attachments.allocate();
    let upload_url = state.attachments.upload_url(storage_id, Utc::now());

    Ok(Json(GenerateUploadResponse {
        storage_id,
        upload_url,
    }))
}

/// Receive the raw screenshot bytes for a previously allocated target.
///
/// PUT /api/v1/uploads/:storage_id?expires=&sig=
pub async fn upload_attachment(
    State(state): State<AppState>,
    Path(storage_id): Path<Uuid>,
    Query(query): Query<SignedUrlQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UploadCompleteResponse>, ApiError> {
    if !state
        .attachments
        .verify_upload(storage_id, query.expires, &query.sig, Utc::now())
    {
        return Err(ApiError::Forbidden(
            "Invalid or expired upload URL".to_string(),
        ));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    state
        .attachments
        .store(storage_id, content_type, &body)
        .await
        .map_err(upload_error)?;

    tracing::info!(
        attachment_id = %storage_id,
        bytes = body.len(),
        "Payment screenshot stored"
    );

    Ok(Json(UploadCompleteResponse { storage_id }))
}

/// Serve attachment bytes for a signed read URL.
///
/// GET /api/v1/attachments/:id?expires=&sig=
pub async fn get_attachment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<SignedUrlQuery>,
) -> Result<Response, ApiError> {
    if !state
        .attachments
        .verify(id, query.expires, &query.sig, Utc::now())
    {
        return Err(ApiError::Forbidden(
            "Invalid or expired attachment URL".to_string(),
        ));
    }

    let (bytes, content_type) = state.attachments.read(id).await.map_err(upload_error)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        bytes,
    )
        .into_response())
}

fn upload_error(err: StorageError) -> ApiError {
    match err {
        StorageError::NotFound(id) => ApiError::NotFound(format!("Attachment {} not found", id)),
        StorageError::TooLarge { limit } => {
            ApiError::PayloadTooLarge(format!("Attachment exceeds the {}-byte limit", limit))
        }
        StorageError::Io(err) => {
            tracing::error!("Attachment storage failure: {}", err);
            ApiError::Internal("Attachment transfer failed".to_string())
        }
    }
}
