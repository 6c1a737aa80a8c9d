//! Predictor Implementation

use crate::model::{ExampleClassifier, ModelLoader};
use crate::onnx::OnnxModelLoader;
use crate::prediction::PredictionResult;
use crate::PredictorError;
use example_codec::encode;
use feature_pipeline::{Preprocessor, RawRecord};
use feature_schema::{FeatureSchema, SchemaVersion};
use metrics::{counter, histogram};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Preprocesses requests for one schema and runs them through the model.
///
/// Starts unloaded. The model is acquired once, on [`Predictor::load_model`]
/// or on the first prediction, and is read-only afterwards.
pub struct Predictor {
    model_dir: PathBuf,
    model_name: String,
    preprocessor: Preprocessor,
    loader: Box<dyn ModelLoader>,
    model: OnceLock<Box<dyn ExampleClassifier>>,
    load_lock: Mutex<()>,
}

impl Predictor {
    /// Create an unloaded predictor
    pub fn new(
        model_dir: impl Into<PathBuf>,
        schema: FeatureSchema,
        loader: impl ModelLoader + 'static,
    ) -> Self {
        let model_dir = model_dir.into();
        let model_name = model_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| schema.name().to_string());
        info!(
            "Creating predictor {} for schema {} ({})",
            model_name,
            schema.name(),
            model_dir.display()
        );

        Self {
            model_dir,
            model_name,
            preprocessor: Preprocessor::new(Arc::new(schema)),
            loader: Box::new(loader),
            model: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    /// Predictor for a built-in schema backed by an ONNX model in `model_dir`
    pub fn onnx(
        model_dir: impl Into<PathBuf>,
        version: SchemaVersion,
        loader: OnnxModelLoader,
    ) -> Result<Self, PredictorError> {
        let schema = FeatureSchema::for_version(version)?;
        Ok(Self::new(model_dir, schema, loader))
    }

    /// Load the model if it is not loaded yet; repeated calls are no-ops
    pub fn load_model(&self) -> Result<(), PredictorError> {
        self.classifier().map(|_| ())
    }

    fn classifier(&self) -> Result<&dyn ExampleClassifier, PredictorError> {
        if let Some(model) = self.model.get() {
            return Ok(model.as_ref());
        }

        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = self.model.get() {
            return Ok(model.as_ref());
        }

        let start = Instant::now();
        let model = self
            .loader
            .load(&self.model_dir, self.preprocessor.schema())
            .map_err(|e| {
                warn!("Failed to load model {}: {}", self.model_name, e);
                e
            })?;
        info!(
            "Model {} loaded in {}ms",
            self.model_name,
            start.elapsed().as_millis()
        );

        let model = self.model.get_or_init(|| model);
        Ok(model.as_ref())
    }

    /// Run one raw request through preprocessing and the model
    pub fn predict(&self, raw: &RawRecord) -> Result<PredictionResult, PredictorError> {
        let start = Instant::now();
        let result = self.classifier().and_then(|model| self.run(model, raw));

        histogram!("perf_quality_prediction_seconds").record(start.elapsed().as_secs_f64());
        match &result {
            Ok(prediction) => {
                counter!("perf_quality_predictions_total", "outcome" => "ok").increment(1);
                if let Some(label) = prediction.label() {
                    counter!("perf_quality_predictions_by_class_total", "class" => label.class.as_str())
                        .increment(1);
                }
            }
            Err(e) => {
                counter!("perf_quality_predictions_total", "outcome" => e.stage()).increment(1);
            }
        }
        result
    }

    fn run(
        &self,
        model: &dyn ExampleClassifier,
        raw: &RawRecord,
    ) -> Result<PredictionResult, PredictorError> {
        let schema = self.preprocessor.schema();
        let record = self.preprocessor.process(raw)?;
        let example = encode(&record, schema)?;
        debug!("Model (x): {} bytes", example.len());

        let scores = model.classify(&example)?;
        let result = PredictionResult::from_scores(schema.classes(), &scores)?;
        debug!("Prediction: {:?}", result);
        Ok(result)
    }

    /// Whether the model has been loaded
    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.preprocessor.schema()
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Model name, the last component of the model directory
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("model_dir", &self.model_dir)
            .field("schema", &self.schema().name())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
