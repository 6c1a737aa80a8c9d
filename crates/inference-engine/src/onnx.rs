//! ONNX Model Backend
//!
//! Runs an ONNX export of the classifier with tract. Each model input is a
//! `[1, 1]` tensor named after a schema field; the encoded example is decoded
//! and every input is fed from the feature of the same name.

use crate::model::{ExampleClassifier, ModelLoader};
use crate::InferenceError;
use example_codec::EncodedExample;
use feature_schema::{FeatureSchema, FieldKind};
use std::fmt::Display;
use std::path::Path;
use tracing::{debug, info};
use tract_onnx::prelude::*;

/// Artifact file name looked up inside the model directory
pub const DEFAULT_MODEL_FILE: &str = "model.onnx";

/// Loads `<model_dir>/<file_name>` into an optimized tract plan
#[derive(Debug, Clone)]
pub struct OnnxModelLoader {
    file_name: String,
    output: Option<String>,
}

impl Default for OnnxModelLoader {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_MODEL_FILE.to_string(),
            output: None,
        }
    }
}

impl OnnxModelLoader {
    /// Loader for a specific artifact file name
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            output: None,
        }
    }

    /// Read probabilities from the named output instead of the first one
    pub fn with_output(mut self, name: impl Into<String>) -> Self {
        self.output = Some(name.into());
        self
    }
}

fn load_error(path: &Path, err: impl Display) -> InferenceError {
    InferenceError::ModelLoadError(format!("{}: {}", path.display(), err))
}

impl ModelLoader for OnnxModelLoader {
    fn load(
        &self,
        model_dir: &Path,
        schema: &FeatureSchema,
    ) -> Result<Box<dyn ExampleClassifier>, InferenceError> {
        let path = model_dir.join(&self.file_name);
        if !path.is_file() {
            return Err(InferenceError::ModelLoadError(format!(
                "model artifact not found: {}",
                path.display()
            )));
        }
        info!("Loading ONNX model from {}", path.display());

        let mut model = tract_onnx::onnx()
            .model_for_path(&path)
            .map_err(|e| load_error(&path, e))?;

        let input_names: Vec<String> = model
            .input_outlets()
            .map_err(|e| load_error(&path, e))?
            .iter()
            .map(|outlet| model.node(outlet.node).name.clone())
            .collect();

        let mut inputs = Vec::with_capacity(input_names.len());
        for (ix, name) in input_names.into_iter().enumerate() {
            let field = schema.field(&name).ok_or_else(|| {
                load_error(
                    &path,
                    format!("input {} is not a field of schema {}", name, schema.name()),
                )
            })?;
            let fact: InferenceFact = match field.kind() {
                FieldKind::Numeric => f32::fact([1usize, 1]).into(),
                FieldKind::Categorical => String::fact([1usize, 1]).into(),
            };
            model
                .set_input_fact(ix, fact)
                .map_err(|e| load_error(&path, e))?;
            inputs.push((name, field.kind()));
        }

        let typed = model.into_optimized().map_err(|e| load_error(&path, e))?;
        let output = match &self.output {
            Some(name) => typed
                .output_outlets()
                .map_err(|e| load_error(&path, e))?
                .iter()
                .position(|&outlet| {
                    typed.node(outlet.node).name == *name
                        || typed.outlet_label(outlet) == Some(name.as_str())
                })
                .ok_or_else(|| load_error(&path, format!("model has no output named {}", name)))?,
            None => 0,
        };
        let plan = typed.into_runnable().map_err(|e| load_error(&path, e))?;

        debug!("ONNX model inputs: {:?}, output #{}", inputs, output);
        Ok(Box::new(OnnxClassifier {
            plan,
            inputs,
            output,
        }))
    }
}

struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
    inputs: Vec<(String, FieldKind)>,
    output: usize,
}

impl OnnxClassifier {
    fn input_tensor(
        example: &example_codec::proto::Example,
        name: &str,
        kind: FieldKind,
    ) -> Result<Tensor, InferenceError> {
        let feature = example
            .feature(name)
            .ok_or_else(|| InferenceError::MissingInput(name.to_string()))?;
        let tensor = match kind {
            FieldKind::Numeric => {
                let value = feature
                    .as_floats()
                    .and_then(|v| v.first().copied())
                    .ok_or_else(|| InferenceError::MissingInput(name.to_string()))?;
                tract_ndarray::arr2(&[[value]]).into()
            }
            FieldKind::Categorical => {
                let value = feature
                    .as_bytes_list()
                    .and_then(|v| v.first())
                    .ok_or_else(|| InferenceError::MissingInput(name.to_string()))?;
                tract_ndarray::arr2(&[[String::from_utf8_lossy(value).into_owned()]]).into()
            }
        };
        Ok(tensor)
    }
}

impl ExampleClassifier for OnnxClassifier {
    fn classify(&self, example: &EncodedExample) -> Result<Vec<f32>, InferenceError> {
        let example = example
            .decode()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let mut inputs: TVec<TValue> = TVec::with_capacity(self.inputs.len());
        for (name, kind) in &self.inputs {
            inputs.push(Self::input_tensor(&example, name, *kind)?.into());
        }

        let outputs = self
            .plan
            .run(inputs)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
        let probabilities = outputs.get(self.output).ok_or_else(|| {
            InferenceError::InvalidOutput(format!("model produced {} outputs", outputs.len()))
        })?;
        let view = probabilities
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InvalidOutput(e.to_string()))?;

        Ok(view.iter().copied().collect())
    }
}
