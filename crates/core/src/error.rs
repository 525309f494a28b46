//! Core domain errors

use thiserror::Error;

/// Errors raised by the pure domain layer
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid loan tenure: {months} months")]
    InvalidTenure { months: u32 },

    #[error("Invalid {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create an InvalidValue error
    pub fn invalid_value(field: &str, value: &str) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}
