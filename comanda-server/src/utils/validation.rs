//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits live here.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: menu item names, categories, usernames
pub const MAX_NAME_LEN: usize = 200;

/// Notes, special instructions, rejection reasons, feedback comments
pub const MAX_NOTE_LEN: usize = 500;

/// Menu item descriptions
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Customer session identifiers
pub const MAX_SESSION_ID_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Image URLs / paths
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        if v.len() > max_len {
            return Err(AppError::validation(format!(
                "{field} is too long ({} chars, max {max_len})",
                v.len()
            )));
        }
    }
    Ok(())
}

/// Validate a 1-5 feedback rating.
pub fn validate_rating(value: i64, field: &str) -> Result<(), AppError> {
    if !(1..=5).contains(&value) {
        return Err(AppError::validation(format!(
            "{field} must be between 1 and 5, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_empty_and_oversized() {
        assert!(validate_required_text("name", "name", 10).is_ok());
        assert!(validate_required_text("   ", "name", 10).is_err());
        assert!(validate_required_text("toolongvalue", "name", 5).is_err());
    }

    #[test]
    fn optional_text_allows_none() {
        assert!(validate_optional_text(None, "note", 5).is_ok());
        assert!(validate_optional_text(Some("ok"), "note", 5).is_ok());
        assert!(validate_optional_text(Some("toolong"), "note", 5).is_err());
    }

    #[test]
    fn ratings_are_one_to_five() {
        for r in 1..=5 {
            assert!(validate_rating(r, "overall").is_ok());
        }
        assert!(validate_rating(0, "overall").is_err());
        assert!(validate_rating(6, "overall").is_err());
    }
}
