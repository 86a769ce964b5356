//! Local validation helpers
//!
//! Every client operation validates its input with these helpers before
//! touching the network, so a [`TrueSignError::Validation`] never has a
//! side effect.

use uuid::Uuid;

use crate::errors::{Result, TrueSignError};

/// Fail with `message` when `value` is empty or only whitespace
pub fn require_non_empty(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TrueSignError::validation(message));
    }
    Ok(())
}

/// Same as [`require_non_empty`] for optional values
pub fn require_present(value: Option<&str>, message: &str) -> Result<()> {
    require_non_empty(value.unwrap_or_default(), message)
}

/// Reject the nil UUID, which the API never issues for an envelope
pub fn require_envelope_id(id: Uuid) -> Result<()> {
    if id.is_nil() {
        return Err(TrueSignError::validation("An envelope ID is required to send this request"));
    }
    Ok(())
}

/// Trim every entry and drop the blank ones, preserving order
pub fn non_empty_entries<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| value.as_ref().trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}
