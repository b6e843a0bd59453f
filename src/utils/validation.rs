//! Validation helpers
//!
//! Custom validators used by the request DTOs alongside the `validator`
//! derive attributes.

use validator::ValidationError;

/// Reject blank or whitespace-only strings
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Idempotency keys are opaque but bounded
pub fn validate_request_token(token: &str) -> Result<(), ValidationError> {
    let len = token.chars().count();
    if len == 0 || len > 128 || token.chars().any(char::is_control) {
        return Err(ValidationError::new("request_token"));
    }
    Ok(())
}
