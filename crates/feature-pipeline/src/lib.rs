//! Feature Preprocessing
//!
//! Turns a raw request attribute map into the fully imputed and normalized
//! record a model schema requires. Stages run in a fixed order that the
//! record types enforce:
//!
//! 1. [`Record::select`]: project the raw input onto the schema's inputs
//! 2. [`add_missing_flags`]: record original missingness of flagged numerics
//! 3. [`fill_missing`]: substitute schema defaults
//! 4. [`normalize`]: z-score numerics, transcode categoricals to bytes

mod error;
mod imputer;
mod indicator;
mod normalizer;
mod preprocessor;
mod record;
mod value;

pub use error::ValidationError;
pub use imputer::fill_missing;
pub use indicator::{add_missing_flags, FLAG_FALSE, FLAG_TRUE};
pub use normalizer::normalize;
pub use preprocessor::Preprocessor;
pub use record::{Flagged, Imputed, ProcessedRecord, RawRecord, Record, Selected, Stage};
pub use value::{ProcessedValue, RawValue};
