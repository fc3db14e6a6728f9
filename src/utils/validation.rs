//! Input validation utilities
//!
//! Validates server URLs, credentials and resource identifiers before any
//! request is sent.

use crate::error::ValidationError;

/// Validate that a URL uses the http or https scheme
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() || (!url.starts_with("http://") && !url.starts_with("https://")) {
        return Err(ValidationError::InvalidUrl {
            url: url.to_string(),
        });
    }

    Ok(())
}

/// Validate that a required value is present
pub fn validate_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validate a resource id and return it trimmed
///
/// Whitespace-only ids are rejected the same way as empty ones.
pub fn validate_resource_id<'a>(field: &str, id: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = id.trim();
    validate_non_empty(field, trimmed)?;
    Ok(trimmed)
}
