//! Model Collaborator Interface

use crate::InferenceError;
use example_codec::EncodedExample;
use feature_schema::FeatureSchema;
use std::path::Path;

/// A loaded classifier.
///
/// Given one encoded example it returns one probability per class, in the
/// schema's class order. Implementations are shared across threads after
/// loading and must tolerate concurrent read-only calls.
pub trait ExampleClassifier: Send + Sync {
    fn classify(&self, example: &EncodedExample) -> Result<Vec<f32>, InferenceError>;
}

impl<F> ExampleClassifier for F
where
    F: Fn(&EncodedExample) -> Result<Vec<f32>, InferenceError> + Send + Sync,
{
    fn classify(&self, example: &EncodedExample) -> Result<Vec<f32>, InferenceError> {
        self(example)
    }
}

/// Acquires a classifier from a model directory
pub trait ModelLoader: Send + Sync {
    fn load(
        &self,
        model_dir: &Path,
        schema: &FeatureSchema,
    ) -> Result<Box<dyn ExampleClassifier>, InferenceError>;
}

impl<F> ModelLoader for F
where
    F: Fn(&Path, &FeatureSchema) -> Result<Box<dyn ExampleClassifier>, InferenceError>
        + Send
        + Sync,
{
    fn load(
        &self,
        model_dir: &Path,
        schema: &FeatureSchema,
    ) -> Result<Box<dyn ExampleClassifier>, InferenceError> {
        self(model_dir, schema)
    }
}
