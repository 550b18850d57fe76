//! Shared input checks for domain constructors.

use super::ValidationError;

/// Minimum length of task and template names.
pub(super) const MIN_NAME_LEN: usize = 3;

/// Minimum length of blocker descriptions.
pub(super) const MIN_BLOCKER_LEN: usize = 5;

/// Trims `value` and checks it holds at least `min` characters.
pub(super) fn require_min_len(
    field: &'static str,
    value: impl Into<String>,
    min: usize,
) -> Result<String, ValidationError> {
    let raw = value.into();
    let trimmed = raw.trim();
    if trimmed.chars().count() < min {
        return Err(ValidationError::new(
            field,
            format!("must be at least {min} characters"),
        ));
    }
    Ok(trimmed.to_owned())
}

/// Trims `value` and rejects it when empty.
pub(super) fn require_non_empty(
    field: &'static str,
    value: impl Into<String>,
) -> Result<String, ValidationError> {
    let raw = value.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(trimmed.to_owned())
}

/// Trims entries and drops empty ones, preserving order.
pub(super) fn clean_list(values: impl IntoIterator<Item = String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .collect()
}
