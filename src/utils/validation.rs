//! Validation helpers for session metadata
//!
//! Checks here report the offending field by name so a malformed record can
//! be traced back to the key that broke it.

use thiserror::Error;

/// Validation result type
pub type ValidationResult<T> = Result<T, ValidationError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value must be strictly positive and finite
    #[error("field '{field}' must be positive, got {value}")]
    NotPositive { field: String, value: String },

    /// Value must be finite
    #[error("field '{field}' must be finite, got {value}")]
    NotFinite { field: String, value: String },

    /// Array size violation
    #[error("field '{field}' has {actual} entries, expected {expected}")]
    InvalidArraySize {
        field: String,
        actual: usize,
        expected: usize,
    },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            ValidationError::NotPositive { field, .. }
            | ValidationError::NotFinite { field, .. }
            | ValidationError::InvalidArraySize { field, .. } => field,
        }
    }
}

/// Validate a strictly positive, finite float
pub fn validate_positive(value: f64, field: &str) -> ValidationResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ValidationError::NotPositive {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Validate a strictly positive count
pub fn validate_count(value: usize, field: &str) -> ValidationResult<()> {
    if value == 0 {
        return Err(ValidationError::NotPositive {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

pub fn validate_finite(value: f64, field: &str) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Validate that an array has exactly the expected number of entries
pub fn validate_array_size<T>(array: &[T], expected: usize, field: &str) -> ValidationResult<()> {
    if array.len() != expected {
        return Err(ValidationError::InvalidArraySize {
            field: field.to_string(),
            actual: array.len(),
            expected,
        });
    }
    Ok(())
}
