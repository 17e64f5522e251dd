//! Common utility functions
//!
//! - Millisecond/sample-index conversion shared by every windowed computation
//! - Field-level validation used when loading session records

pub mod conversion;
pub mod validation;

pub use conversion::{ms_to_sample_index, sample_index_to_ms};

pub use validation::{
    validate_array_size, validate_count, validate_finite, validate_positive, ValidationError,
    ValidationResult,
};

impl From<ValidationError> for crate::error::EmgError {
    fn from(err: ValidationError) -> Self {
        crate::error::EmgError::MalformedSessionData {
            path: Some(err.field().to_string()),
            reason: err.to_string(),
        }
    }
}
