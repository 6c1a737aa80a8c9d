//! Schema Error Types

use crate::schema::FieldKind;
use thiserror::Error;

/// Misuse or inconsistency of a feature schema
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// Version identifier does not name a known schema
    #[error("Unknown schema version: {0}")]
    UnknownVersion(String),

    /// Field is not declared by the schema
    #[error("Field {0} is not declared by the schema")]
    UnknownField(String),

    /// Numeric-only operation requested on a categorical field
    #[error("Field {0} is not numeric")]
    NotNumeric(String),

    /// Same field name declared twice
    #[error("Duplicate field: {0}")]
    DuplicateField(String),

    /// Default value does not match the declared kind
    #[error("Default for {field} must be {expected}")]
    DefaultTypeMismatch { field: String, expected: FieldKind },

    /// Statistics that cannot be used for z-score scaling
    #[error("Invalid normalization statistics for {field}: mean={mean}, std_dev={std_dev}")]
    InvalidStats {
        field: String,
        mean: f64,
        std_dev: f64,
    },

    /// Schema without any input field
    #[error("Schema {0} declares no fields")]
    Empty(String),

    /// Class index set is empty or repeats an index
    #[error("Invalid class set: {0}")]
    InvalidClasses(String),
}
