pub mod auth;
pub mod courses;
pub mod feed;
pub mod points;
pub mod progress;
pub mod users;

use crate::error::{ApiError, Result};

/// Trim a required text field, rejecting blank input.
pub(crate) fn required_text(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}
