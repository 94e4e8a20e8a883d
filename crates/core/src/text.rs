//! Input normalization shared by every service.
//!
//! Free-text input is trimmed before any length check, and lengths are
//! counted in characters, not bytes.

use crate::error::CoreError;

/// Trim surrounding whitespace and enforce a character cap.
pub fn bounded(
    context: &'static str,
    field: &'static str,
    value: &str,
    limit: usize,
) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > limit {
        return Err(CoreError::ValidationTooLong {
            field,
            context,
            limit,
        });
    }
    Ok(trimmed.to_string())
}

/// Like [`bounded`], but a blank result is an error.
pub fn required(
    context: &'static str,
    field: &'static str,
    value: &str,
    limit: usize,
) -> Result<String, CoreError> {
    let value = bounded(context, field, value, limit)?;
    if value.is_empty() {
        return Err(CoreError::ValidationRequired { field, context });
    }
    Ok(value)
}

/// Normalize an optional field of a partial update.
///
/// Absent and blank-after-trim both mean "not provided".
pub fn patch(
    context: &'static str,
    field: &'static str,
    value: Option<&str>,
    limit: usize,
) -> Result<Option<String>, CoreError> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let value = bounded(context, field, raw, limit)?;
            Ok(if value.is_empty() { None } else { Some(value) })
        }
    }
}

/// Build a case-insensitive `ILIKE` substring pattern, escaping wildcards.
pub fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
