//! Admin session capability issued at login.
//!
//! The original admin gate was a boolean held in view state after a shared
//! secret comparison. It is re-expressed here as an issued token with expiry;
//! the credential is still a single shared password, not a user system.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix on every admin session token.
pub const SESSION_TOKEN_PREFIX: &str = "fpa_";

/// Length of the random part of a session token.
const TOKEN_RANDOM_LEN: usize = 32;

/// Token charset without visually ambiguous characters (0, O, 1, l, I).
const TOKEN_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789";

/// An issued admin session. Only the SHA-256 hash of the token is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminSession {
    pub id: Uuid,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Request body for admin login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminLoginRequest {
    pub password: String,
}

/// Response after a successful login. The token is shown exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminLoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Generates a new opaque session token.
pub fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();
    let random: String = (0..TOKEN_RANDOM_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..TOKEN_CHARSET.len());
            TOKEN_CHARSET[idx] as char
        })
        .collect();
    format!("{}{}", SESSION_TOKEN_PREFIX, random)
}

/// Computes a session expiry from now.
pub fn session_expiry(ttl_secs: i64) -> DateTime<Utc> {
    Utc::now() + Duration::seconds(ttl_secs)
}
