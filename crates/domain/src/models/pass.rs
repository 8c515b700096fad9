//! Pass-ID generation and QR payload serialization.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Alphabet for the random pass-ID suffix.
const SUFFIX_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Number of random suffix characters.
const SUFFIX_LEN: usize = 3;

/// Number of timestamp digits kept in the pass ID.
const TIME_DIGITS: u64 = 1_000_000;

/// Generates a short, human-presentable pass identifier.
///
/// Format: `<prefix>` + last 6 digits of the current millisecond timestamp +
/// 3 random characters from `0-9A-Z`. Uniqueness is statistical only; the
/// store enforces a hard guarantee with a unique index and a retry loop.
pub fn generate_pass_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis() as u64 % TIME_DIGITS;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..SUFFIX_CHARSET.len());
            SUFFIX_CHARSET[idx] as char
        })
        .collect();
    format!("{}{:06}{}", prefix, millis, suffix)
}

/// Checks that a string has the shape produced by [`generate_pass_id`].
pub fn is_valid_pass_id(pass_id: &str, prefix: &str) -> bool {
    let Some(rest) = pass_id.strip_prefix(prefix) else {
        return false;
    };
    if rest.len() != 6 + SUFFIX_LEN {
        return false;
    }
    let (digits, suffix) = rest.split_at(6);
    digits.bytes().all(|b| b.is_ascii_digit())
        && suffix.bytes().all(|b| SUFFIX_CHARSET.contains(&b))
}

/// QR payload embedded in the digital pass.
///
/// Serialized with camelCase keys to match the payload the pass renderer
/// already understands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassQrPayload {
    pub pass_id: String,
    pub name: String,
    pub event: String,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
}

/// Builds the serialized QR payload stored on the registration.
pub fn pass_qr_payload(
    pass_id: &str,
    name: &str,
    event: &str,
    created_at: DateTime<Utc>,
) -> String {
    let payload = PassQrPayload {
        pass_id: pass_id.to_string(),
        name: name.to_string(),
        event: event.to_string(),
        timestamp: created_at.timestamp_millis(),
    };
    // A struct of strings and an i64 cannot fail to serialize.
    serde_json::to_string(&payload).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_pass_id_shape() {
        let pass_id = generate_pass_id("FF");
        assert_eq!(pass_id.len(), 2 + 6 + 3);
        assert!(is_valid_pass_id(&pass_id, "FF"));
    }

    #[test]
    fn test_generate_pass_id_pairwise_distinct() {
        // Same-millisecond collisions are only prevented by the random
        // suffix, so generate a large batch and require all distinct.
        let ids: HashSet<String> = (0..2000).map(|_| generate_pass_id("FF")).collect();
        assert_eq!(ids.len(), 2000);
    }

    #[test]
    fn test_generate_pass_id_custom_prefix() {
        let pass_id = generate_pass_id("KFF");
        assert!(pass_id.starts_with("KFF"));
        assert!(is_valid_pass_id(&pass_id, "KFF"));
    }

    #[test]
    fn test_is_valid_pass_id_rejects_bad_shapes() {
        assert!(!is_valid_pass_id("FF12345ABC", "FF")); // 5 digits
        assert!(!is_valid_pass_id("FF123456ab1", "FF")); // lowercase suffix
        assert!(!is_valid_pass_id("XX123456ABC", "FF")); // wrong prefix
        assert!(!is_valid_pass_id("FF123456ABCD", "FF")); // too long
        assert!(!is_valid_pass_id("", "FF"));
    }

    #[test]
    fn test_qr_payload_wire_format() {
        let created_at = chrono::TimeZone::timestamp_millis_opt(&Utc, 1_700_000_000_123).unwrap();
        let payload = pass_qr_payload(
            "FF123456ABC",
            "Ram Shrestha",
            "Kathmandu Friendship Fiesta",
            created_at,
        );
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["passId"], "FF123456ABC");
        assert_eq!(value["name"], "Ram Shrestha");
        assert_eq!(value["event"], "Kathmandu Friendship Fiesta");
        assert_eq!(value["timestamp"], 1_700_000_000_123_i64);
    }

    #[test]
    fn test_qr_payload_round_trip() {
        let created_at = Utc::now();
        let raw = pass_qr_payload("FF000001XYZ", "Sita Rai", "Fiesta", created_at);
        let parsed: PassQrPayload = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.pass_id, "FF000001XYZ");
        assert_eq!(parsed.timestamp, created_at.timestamp_millis());
    }
}
