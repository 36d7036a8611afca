//! ONNX Classifier - ONNX Runtime Integration
//!
//! Runs a gradient-boosting classifier exported to ONNX. The export must
//! emit plain tensors (no ZipMap): the `probabilities` output is read as
//! a `[1, 2]` float tensor.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use parking_lot::Mutex;

use super::classifier::{ClassProbabilities, Classifier};
use crate::error::{ArtifactError, PredictError, PredictResult};

/// Preferred output name of tree-ensemble exports
const PROBABILITY_OUTPUT: &str = "probabilities";

pub struct OnnxClassifier {
    // `Session::run` needs exclusive access
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxClassifier {
    /// Load ONNX model from file
    pub fn load(model_path: &Path) -> Result<Self, ArtifactError> {
        let session = Session::builder()
            .map_err(|e| ArtifactError::Onnx(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ArtifactError::Onnx(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| ArtifactError::Onnx(format!("Failed to load model: {}", e)))?;

        Self::from_session(session)
    }

    fn from_session(session: Session) -> Result<Self, ArtifactError> {
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == PROBABILITY_OUTPUT)
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| ArtifactError::Onnx("No output defined".to_string()))?;

        log::info!("ONNX model loaded successfully (output: {})", output_name);

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn n_features(&self) -> Option<usize> {
        None
    }

    fn predict_proba(&self, features: &[f64]) -> PredictResult<ClassProbabilities> {
        let input: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, features.len()), input)
            .map_err(|e| PredictError::Inference(format!("Array error: {}", e)))?;

        let input_tensor = Tensor::from_array(input_array)
            .map_err(|e| PredictError::Inference(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| PredictError::Inference(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| PredictError::Inference("No output".to_string()))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| PredictError::Inference(format!("Extract error: {}", e)))?;

        let values: Vec<f64> = data.iter().map(|&v| v as f64).collect();
        drop(outputs);
        drop(session);

        ClassProbabilities::from_output(&values)
    }
}
