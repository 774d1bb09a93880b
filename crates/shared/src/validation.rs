//! Input normalization helpers.
//!
//! Syntax rules (email format, length limits) live on the request types as
//! `validator` attributes; these helpers only deal with blank input.

/// Trims a value and returns `None` when nothing is left.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Returns true when the value contains at least one non-whitespace character.
pub fn is_present(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}
