//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen based on reasonable UX limits for names,
//! notes and modification reasons; the in-memory store has no
//! built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: employee name, shift name, period name, rule name
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, modification reasons
pub const MAX_NOTE_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::invalid_input(format!(
            "{field} must not be empty"
        )));
    }
    if value.len() > max_len {
        return Err(AppError::invalid_input(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
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
        && v.len() > max_len
    {
        return Err(AppError::invalid_input(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate that a monetary or hour amount is not negative.
pub fn validate_non_negative(amount: f64, field: &str) -> Result<(), AppError> {
    if amount < 0.0 {
        return Err(AppError::invalid_input(format!(
            "{field} cannot be negative: {amount}"
        )));
    }
    Ok(())
}
