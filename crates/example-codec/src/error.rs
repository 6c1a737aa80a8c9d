//! Encoding Error Types

use feature_schema::FieldKind;
use thiserror::Error;

/// Errors while building or reading an encoded example
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    /// Schema field absent from the processed record
    #[error("Required field missing at encode time: {0}")]
    MissingField(String),

    /// Processed value does not match the declared kind
    #[error("Field {field} must be {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        actual: FieldKind,
    },

    /// Bytes are not a valid example message
    #[error("Malformed example: {0}")]
    Decode(String),
}

impl From<prost::DecodeError> for EncodingError {
    fn from(err: prost::DecodeError) -> Self {
        EncodingError::Decode(err.to_string())
    }
}
