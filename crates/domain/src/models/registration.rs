//! Registration domain model and moderation DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// How the attendee paid the registration fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Qr,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Qr => write!(f, "qr"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "qr" => Ok(PaymentMethod::Qr),
            other => Err(UnknownVariant {
                field: "payment_method",
                value: other.to_string(),
            }),
        }
    }
}

/// Moderation status of a registration.
///
/// Every transition is permitted, including back to `pending`; a transition
/// only happens through explicit admin action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    Verified,
    Rejected,
}

impl RegistrationStatus {
    pub const ALL: [RegistrationStatus; 3] = [
        RegistrationStatus::Pending,
        RegistrationStatus::Verified,
        RegistrationStatus::Rejected,
    ];

    /// Applies a status change, reporting whether anything actually changed.
    ///
    /// Re-applying the current status is a no-op observable as success.
    pub fn transition(self, new: RegistrationStatus) -> StatusTransition {
        if self == new {
            StatusTransition::Unchanged
        } else {
            StatusTransition::Changed { from: self }
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationStatus::Pending => write!(f, "pending"),
            RegistrationStatus::Verified => write!(f, "verified"),
            RegistrationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for RegistrationStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RegistrationStatus::Pending),
            "verified" => Ok(RegistrationStatus::Verified),
            "rejected" => Ok(RegistrationStatus::Rejected),
            other => Err(UnknownVariant {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Outcome of a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    Unchanged,
    Changed { from: RegistrationStatus },
}

/// Error for a string that does not name a known enum variant.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown {field} value: {value}")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

/// Registration domain model, one per attendee submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Registration {
    pub id: Uuid,
    pub name: String,
    pub home_club: String,
    pub designation: String,
    pub phone_number: String,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_screenshot: Option<Uuid>,
    pub pass_id: String,
    pub qr_code: String,
    pub created_at: DateTime<Utc>,
    pub status: RegistrationStatus,
}

impl Registration {
    /// Case-insensitive substring match over the searchable fields
    /// (name, home club, designation, pass id).
    ///
    /// `needle` must already be lowercased by the caller.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.home_club.to_lowercase().contains(needle)
            || self.designation.to_lowercase().contains(needle)
            || self.pass_id.to_lowercase().contains(needle)
    }
}

/// Request to create a new registration (public intake form).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateRegistrationRequest {
    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 200, message = "Name must be at most 200 characters")
    )]
    pub name: String,
    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 200, message = "Home club must be at most 200 characters")
    )]
    pub home_club: String,
    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 100, message = "Designation must be at most 100 characters")
    )]
    pub designation: String,
    #[validate(custom(function = "shared::validation::validate_phone_number"))]
    pub phone_number: String,
    pub payment_method: PaymentMethod,
    /// Opaque attachment storage id from the upload step. Not required for
    /// `qr` payments; the form never enforced it and neither does the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_screenshot: Option<Uuid>,
}

/// Response after a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateRegistrationResponse {
    pub registration_id: Uuid,
    pub pass_id: String,
}

/// Request to change a registration's moderation status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateStatusRequest {
    pub status: RegistrationStatus,
}

/// A registration as shown in the moderation view, with a resolved
/// screenshot URL when one exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationWithUrl {
    #[serde(flatten)]
    pub registration: Registration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,
}

/// Query parameters for the moderation listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListRegistrationsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// `all` or one of the status values; defaults to `all`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Aggregate moderation counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationStats {
    pub total: usize,
    pub pending: usize,
    pub verified: usize,
    pub rejected: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, pass_id: &str) -> Registration {
        Registration {
            id: Uuid::new_v4(),
            name: name.to_string(),
            home_club: "Kathmandu Club".to_string(),
            designation: "President".to_string(),
            phone_number: "+977-9800000000".to_string(),
            payment_method: PaymentMethod::Cash,
            payment_screenshot: None,
            pass_id: pass_id.to_string(),
            qr_code: "{}".to_string(),
            created_at: Utc::now(),
            status: RegistrationStatus::Pending,
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in RegistrationStatus::ALL {
            let parsed: RegistrationStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_rejects_unknown() {
        assert!("approved".parse::<RegistrationStatus>().is_err());
        assert!("".parse::<RegistrationStatus>().is_err());
    }

    #[test]
    fn test_payment_method_round_trip() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("qr".parse::<PaymentMethod>().unwrap(), PaymentMethod::Qr);
        assert!("card".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_transition_same_status_is_unchanged() {
        for status in RegistrationStatus::ALL {
            assert_eq!(status.transition(status), StatusTransition::Unchanged);
        }
    }

    #[test]
    fn test_transition_any_to_any_is_allowed() {
        for from in RegistrationStatus::ALL {
            for to in RegistrationStatus::ALL {
                if from != to {
                    assert_eq!(from.transition(to), StatusTransition::Changed { from });
                }
            }
        }
    }

    #[test]
    fn test_matches_search_is_case_insensitive() {
        let reg = sample("Ram Shrestha", "FF123456ABC");
        assert!(reg.matches_search("kath"));
        assert!(reg.matches_search("ram"));
        assert!(reg.matches_search("president"));
        assert!(reg.matches_search("ff123456"));
        assert!(!reg.matches_search("pokhara"));
    }

    #[test]
    fn test_create_request_valid() {
        let request = CreateRegistrationRequest {
            name: "Ram Shrestha".to_string(),
            home_club: "Kathmandu Club".to_string(),
            designation: "President".to_string(),
            phone_number: "+977-9800000000".to_string(),
            payment_method: PaymentMethod::Cash,
            payment_screenshot: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_blank_name() {
        let request = CreateRegistrationRequest {
            name: "  ".to_string(),
            home_club: "Kathmandu Club".to_string(),
            designation: "President".to_string(),
            phone_number: "+977-9800000000".to_string(),
            payment_method: PaymentMethod::Cash,
            payment_screenshot: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_bad_phone() {
        let request = CreateRegistrationRequest {
            name: "Ram Shrestha".to_string(),
            home_club: "Kathmandu Club".to_string(),
            designation: "President".to_string(),
            phone_number: "not a phone".to_string(),
            payment_method: PaymentMethod::Qr,
            payment_screenshot: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_registration_with_url_flattens() {
        let reg = sample("Ram Shrestha", "FF123456ABC");
        let with_url = RegistrationWithUrl {
            registration: reg,
            screenshot_url: Some("https://example.com/att".to_string()),
        };
        let json = serde_json::to_value(&with_url).unwrap();
        assert_eq!(json["pass_id"], "FF123456ABC");
        assert_eq!(json["screenshot_url"], "https://example.com/att");
    }
}
