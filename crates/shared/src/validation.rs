//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Permissive phone pattern: digits, `+`, `-`, spaces, parentheses.
    static ref PHONE_PATTERN: Regex =
        Regex::new(r"^[0-9+\-() ]{5,20}$").expect("phone pattern is valid");
}

/// Validates a phone number against the permissive phone-character pattern.
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    if PHONE_PATTERN.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message =
            Some("Phone number may only contain digits, +, -, spaces and parentheses".into());
        Err(err)
    }
}

/// Validates that a required text field is not blank (whitespace-only counts as blank).
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Field must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}
