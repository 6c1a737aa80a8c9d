//! Validation Error Types

use thiserror::Error;

/// Errors while coercing imputed values to their declared types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value of a numeric field does not parse as a float
    #[error("{field} value {value:?} is not a number")]
    NotNumeric { field: String, value: String },

    /// Field still missing after imputation
    #[error("Missing value for field: {0}")]
    MissingValue(String),
}
