//! Performance Quality Inference
//!
//! Owns the model handle and runs raw request attributes through
//! preprocessing, example encoding and the classifier, decoding the output
//! into class probabilities.

mod model;
mod onnx;
mod prediction;
mod predictor;

pub use model::{ExampleClassifier, ModelLoader};
pub use onnx::{OnnxModelLoader, DEFAULT_MODEL_FILE};
pub use prediction::{Label, PerformanceClass, PredictionResult};
pub use predictor::Predictor;

use example_codec::EncodingError;
use feature_pipeline::ValidationError;
use feature_schema::SchemaError;
use thiserror::Error;

/// Errors raised by the model collaborator
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Model input {0} has no matching feature in the example")]
    MissingInput(String),
    #[error("Invalid model output: {0}")]
    InvalidOutput(String),
}

/// Failure of a prediction, identifying the stage that failed
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] SchemaError),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl PredictorError {
    /// Short name of the failing stage
    pub fn stage(&self) -> &'static str {
        match self {
            PredictorError::Configuration(_) => "configuration",
            PredictorError::Validation(_) => "validation",
            PredictorError::Encoding(_) => "encoding",
            PredictorError::Inference(InferenceError::ModelLoadError(_)) => "model_load",
            PredictorError::Inference(_) => "inference",
        }
    }
}
