//! Small text validation helpers shared by the domain modules.

use crate::error::{DomainError, DomainResult};

/// Require a non-blank value of at most `max` characters.
pub fn require_text(field: &str, value: &str, max: usize) -> DomainResult<()> {
    require_len(field, value, 1, max)
}

/// Require a non-blank value with a character count in `min..=max`.
pub fn require_len(field: &str, value: &str, min: usize, max: usize) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    let len = value.chars().count();
    if len < min || len > max {
        return Err(DomainError::validation(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

/// Optional text limited to `max` characters.
pub fn limit_text(field: &str, value: Option<&str>, max: usize) -> DomainResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(DomainError::validation(format!(
            "{field} must not exceed {max} characters"
        ))),
        _ => Ok(()),
    }
}

/// Case-insensitive substring match; an empty needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
