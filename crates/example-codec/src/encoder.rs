//! Record Encoder

use crate::error::EncodingError;
use crate::proto::{Example, Feature, Features};
use feature_pipeline::{ProcessedRecord, ProcessedValue};
use feature_schema::FeatureSchema;
use prost::Message;
use std::collections::BTreeMap;
use tracing::debug;

/// Serialized example, consumed once by a model call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedExample(Vec<u8>);

impl EncodedExample {
    /// Wrap bytes produced elsewhere (e.g. by another client of the model)
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse the bytes back into an [`Example`]
    pub fn decode(&self) -> Result<Example, EncodingError> {
        Ok(Example::decode(self.0.as_slice())?)
    }
}

/// Encode every schema field of `record`.
///
/// A missing or mistyped field means an earlier stage broke its contract.
pub fn encode(
    record: &ProcessedRecord,
    schema: &FeatureSchema,
) -> Result<EncodedExample, EncodingError> {
    let mut feature = BTreeMap::new();

    for field in schema.fields() {
        let value = record
            .get(field.name())
            .ok_or_else(|| EncodingError::MissingField(field.name().to_string()))?;
        if value.kind() != field.kind() {
            return Err(EncodingError::TypeMismatch {
                field: field.name().to_string(),
                expected: field.kind(),
                actual: value.kind(),
            });
        }

        let encoded = match value {
            ProcessedValue::Float(v) => Feature::float(*v as f32),
            ProcessedValue::Bytes(b) => Feature::bytes(b.clone()),
        };
        feature.insert(field.name().to_string(), encoded);
    }

    let example = Example {
        features: Some(Features { feature }),
    };
    let bytes = example.encode_to_vec();
    debug!("Encoded example: {} features, {} bytes", example.len(), bytes.len());

    Ok(EncodedExample(bytes))
}
