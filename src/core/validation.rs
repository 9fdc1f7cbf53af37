//! User input validation errors
//!
//! These are the only errors meant to reach the user directly. Everything
//! else is logged and recovered or propagated as `anyhow::Error`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must not be blank")]
    BlankTitle,
    #[error("description must not be blank")]
    BlankDescription,
    /// Frequency text that is not a whole number
    #[error("frequency '{0}' is not a whole number of days")]
    InvalidFrequency(String),
    #[error("frequency must be at least 1 day (got {0})")]
    NonPositiveFrequency(i64),
    #[error("plant name must not be blank")]
    BlankPlantName,
}

/// Reject empty or whitespace-only text
pub fn require_text(value: &str, error: ValidationError) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error)
    } else {
        Ok(())
    }
}

/// Parse a frequency typed into a form field
pub fn parse_frequency(raw: &str) -> Result<u32, ValidationError> {
    let days: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidFrequency(raw.to_string()))?;
    check_frequency(days)
}

/// Frequencies are whole days, minimum 1
pub fn check_frequency(days: i64) -> Result<u32, ValidationError> {
    if days < 1 {
        return Err(ValidationError::NonPositiveFrequency(days));
    }
    u32::try_from(days).map_err(|_| ValidationError::InvalidFrequency(days.to_string()))
}
