//! Registration gate: the process-wide open/closed flag for intake.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Singleton gate state. Absent storage reads as the default open gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationGate {
    pub is_closed: bool,
    /// Timestamp of the most recent open/close toggle; `None` if the gate
    /// has never been toggled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl RegistrationGate {
    /// The state reported before any toggle has ever happened.
    pub fn default_open() -> Self {
        Self {
            is_closed: false,
            last_updated: None,
        }
    }
}

impl Default for RegistrationGate {
    fn default() -> Self {
        Self::default_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gate_is_open() {
        let gate = RegistrationGate::default_open();
        assert!(!gate.is_closed);
        assert!(gate.last_updated.is_none());
    }

    #[test]
    fn test_gate_serialization_omits_missing_timestamp() {
        let gate = RegistrationGate::default_open();
        let json = serde_json::to_string(&gate).unwrap();
        assert_eq!(json, r#"{"is_closed":false}"#);
    }

    #[test]
    fn test_gate_serialization_with_timestamp() {
        let gate = RegistrationGate {
            is_closed: true,
            last_updated: Some(Utc::now()),
        };
        let json = serde_json::to_value(&gate).unwrap();
        assert_eq!(json["is_closed"], true);
        assert!(json["last_updated"].is_string());
    }
}
