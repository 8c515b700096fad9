//! Filesystem-backed attachment store for payment screenshots.
//!
//! Blobs are written under the configured root directory keyed by a UUID,
//! with a small sidecar file holding the uploaded content type. Reads go
//! through time-bounded HMAC-signed URLs minted per record by the moderation
//! listing; the store never inspects or validates the bytes.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use crate::config::StorageConfig;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Errors from attachment storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Attachment not found: {0}")]
    NotFound(Uuid),

    #[error("Attachment exceeds the {limit}-byte upload limit")]
    TooLarge { limit: usize },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filesystem attachment store with signed read URLs.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    root_dir: PathBuf,
    signing_secret: String,
    url_ttl_secs: i64,
    max_upload_bytes: usize,
    public_base_url: String,
}

impl AttachmentStore {
    pub fn new(config: &StorageConfig, public_base_url: &str) -> Self {
        Self {
            root_dir: PathBuf::from(&config.root_dir),
            signing_secret: config.signing_secret.clone(),
            url_ttl_secs: config.url_ttl_secs,
            max_upload_bytes: config.max_upload_bytes,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Allocates a fresh storage id for a two-step upload.
    pub fn allocate(&self) -> Uuid {
        Uuid::new_v4()
    }

    /// Mints the short-lived signed URL the client PUTs the screenshot
    /// bytes to.
    pub fn upload_url(&self, id: Uuid, now: DateTime<Utc>) -> String {
        let expires = now.timestamp() + self.url_ttl_secs;
        let signature =
            shared::crypto::sign_expiring(&self.signing_secret, &upload_resource(id), expires);
        format!(
            "{}/api/v1/uploads/{}?expires={}&sig={}",
            self.public_base_url, id, expires, signature
        )
    }

    /// Verifies a signed upload URL's signature and expiry.
    pub fn verify_upload(&self, id: Uuid, expires: i64, signature: &str, now: DateTime<Utc>) -> bool {
        shared::crypto::verify_expiring(
            &self.signing_secret,
            &upload_resource(id),
            expires,
            signature,
            now.timestamp(),
        )
    }

    /// Stores the uploaded bytes and their content type.
    pub async fn store(
        &self,
        id: Uuid,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        if bytes.len() > self.max_upload_bytes {
            return Err(StorageError::TooLarge {
                limit: self.max_upload_bytes,
            });
        }

        tokio::fs::create_dir_all(&self.root_dir).await?;
        tokio::fs::write(self.blob_path(id), bytes).await?;
        tokio::fs::write(
            self.meta_path(id),
            content_type.unwrap_or(DEFAULT_CONTENT_TYPE),
        )
        .await?;

        Ok(())
    }

    /// Reads an attachment back as (bytes, content type).
    pub async fn read(&self, id: Uuid) -> Result<(Vec<u8>, String), StorageError> {
        let bytes = match tokio::fs::read(self.blob_path(id)).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(id));
            }
            Err(err) => return Err(err.into()),
        };

        let content_type = tokio::fs::read_to_string(self.meta_path(id))
            .await
            .unwrap_or_else(|_| DEFAULT_CONTENT_TYPE.to_string());

        Ok((bytes, content_type))
    }

    /// Whether a blob exists for the given id.
    pub async fn exists(&self, id: Uuid) -> bool {
        tokio::fs::try_exists(self.blob_path(id)).await.unwrap_or(false)
    }

    /// Mints a time-bounded signed read URL for an attachment.
    pub fn signed_url(&self, id: Uuid, now: DateTime<Utc>) -> String {
        let expires = now.timestamp() + self.url_ttl_secs;
        let signature = shared::crypto::sign_expiring(&self.signing_secret, &resource(id), expires);
        format!(
            "{}/api/v1/attachments/{}?expires={}&sig={}",
            self.public_base_url, id, expires, signature
        )
    }

    /// Verifies a signed read URL's signature and expiry.
    pub fn verify(&self, id: Uuid, expires: i64, signature: &str, now: DateTime<Utc>) -> bool {
        shared::crypto::verify_expiring(
            &self.signing_secret,
            &resource(id),
            expires,
            signature,
            now.timestamp(),
        )
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    fn blob_path(&self, id: Uuid) -> PathBuf {
        self.root_dir.join(id.to_string())
    }

    fn meta_path(&self, id: Uuid) -> PathBuf {
        self.root_dir.join(format!("{}.type", id))
    }
}

/// Stable resource string bound into a read-URL signature.
fn resource(id: Uuid) -> String {
    format!("attachment/{}", id)
}

/// Stable resource string bound into an upload-URL signature.
fn upload_resource(id: Uuid) -> String {
    format!("upload/{}", id)
}
