//! Input validation helpers
//!
//! Centralized text length constants and validation functions shared by the
//! checkout, catalog and account handlers.

use shared::error::{AppError, ErrorCode};
use validator::ValidateEmail;

// ── Text length limits ──────────────────────────────────────────────

/// Person and product names
pub const MAX_NAME_LEN: usize = 200;

/// Rejection reasons, payment references, short descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Long product descriptions
pub const MAX_LONG_TEXT_LEN: usize = 10_000;

/// Phone numbers
pub const MAX_PHONE_LEN: usize = 32;

/// Minimum phone length (8 digits for a local Malian number)
pub const MIN_PHONE_LEN: usize = 8;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Image URLs
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} est requis")).with_detail("field", field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} est trop long (maximum {max_len} caractères)"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} est trop long (maximum {max_len} caractères)"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate an email address
pub fn validate_email(value: &str, field: &str) -> Result<(), AppError> {
    let value = value.trim();
    if value.len() > MAX_EMAIL_LEN || !value.validate_email() {
        return Err(AppError::validation("Email invalide").with_detail("field", field));
    }
    Ok(())
}

/// Validate a phone number: minimum length, digits and the usual separators only
pub fn validate_phone(value: &str, field: &str) -> Result<(), AppError> {
    let value = value.trim();
    let well_formed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '.' | '(' | ')'));
    if value.chars().count() < MIN_PHONE_LEN || value.len() > MAX_PHONE_LEN || !well_formed {
        return Err(
            AppError::validation("Numéro de téléphone invalide").with_detail("field", field)
        );
    }
    Ok(())
}

/// Validate a new password
pub fn validate_password(value: &str) -> Result<(), AppError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    if value.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Le mot de passe est trop long (maximum {MAX_PASSWORD_LEN} caractères)"
        )));
    }
    Ok(())
}

/// Normalize an email for storage and lookup
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Trim an optional string, mapping blank to `None`
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
