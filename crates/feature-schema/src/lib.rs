//! Feature Schemas
//!
//! Declares, per model generation, which request attributes a classifier
//! consumes, their types, the defaults used for imputation and the fixed
//! z-score statistics of the numeric inputs.

mod error;
mod schema;
mod version;

pub use error::SchemaError;
pub use schema::{
    DefaultValue, FeatureSchema, FieldDefinition, FieldKind, NormalizationStats, SchemaDefinition,
    SchemaField, INDICATOR_SUFFIX,
};
pub use version::SchemaVersion;
