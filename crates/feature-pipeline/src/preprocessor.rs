//! Preprocessing Pipeline

use crate::error::ValidationError;
use crate::imputer::fill_missing;
use crate::indicator::add_missing_flags;
use crate::normalizer::normalize;
use crate::record::{ProcessedRecord, RawRecord, Record, Selected};
use feature_schema::FeatureSchema;
use std::sync::Arc;
use tracing::debug;

/// Runs every preprocessing stage for one schema
#[derive(Debug, Clone)]
pub struct Preprocessor {
    schema: Arc<FeatureSchema>,
}

impl Preprocessor {
    /// Create a preprocessor for the given schema
    pub fn new(schema: Arc<FeatureSchema>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Flag, impute and normalize one raw request
    pub fn process(&self, raw: &RawRecord) -> Result<ProcessedRecord, ValidationError> {
        let selected = Record::<Selected>::select(raw, &self.schema);
        let flagged = add_missing_flags(selected, &self.schema);
        let imputed = fill_missing(flagged, &self.schema);
        debug!("Model input ({}): {:?}", self.schema.name(), imputed);
        normalize(imputed, &self.schema)
    }
}
