//! Cryptographic utilities for session token hashing and attachment URL signing.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Signs a resource identifier together with its expiry timestamp.
///
/// Returns the hex-encoded HMAC-SHA256 tag over `"<resource>:<expires_unix>"`.
/// Used to mint time-bounded attachment read URLs.
pub fn sign_expiring(secret: &str, resource: &str, expires_unix: i64) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(format!("{}:{}", resource, expires_unix).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a signature produced by [`sign_expiring`].
///
/// Returns false when the tag does not match or when `expires_unix` is in the
/// past relative to `now_unix`. Tag comparison is constant-time.
pub fn verify_expiring(
    secret: &str,
    resource: &str,
    expires_unix: i64,
    signature_hex: &str,
    now_unix: i64,
) -> bool {
    if expires_unix < now_unix {
        return false;
    }

    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(format!("{}:{}", resource, expires_unix).as_bytes());
    mac.verify_slice(&signature).is_ok()
}
