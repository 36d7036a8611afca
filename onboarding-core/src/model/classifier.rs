//! Classifier - Binary onboarding success model
//!
//! The trained model is an external artifact. Anything that can produce a
//! class-probability pair for a scaled vector plugs in behind
//! [`Classifier`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, PredictError, PredictResult};

// ============================================================================
// PROBABILITIES
// ============================================================================

/// Output of `predict_proba` for the two classes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    /// P(class 0): onboarding failure
    pub failure: f64,
    /// P(class 1): onboarding success
    pub success: f64,
}

impl ClassProbabilities {
    /// Build from P(success) alone
    pub fn from_success(success: f64) -> Self {
        let success = success.clamp(0.0, 1.0);
        Self {
            failure: 1.0 - success,
            success,
        }
    }

    /// Build from raw model output (one or two values)
    pub fn from_output(values: &[f64]) -> PredictResult<Self> {
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(PredictError::Inference(format!(
                "classifier produced a non-finite probability ({})",
                bad
            )));
        }
        match values {
            [success] => Ok(Self::from_success(*success)),
            [failure, success] => Ok(Self {
                failure: *failure,
                success: *success,
            }),
            other => Err(PredictError::Inference(format!(
                "expected 1 or 2 class probabilities, got {}",
                other.len()
            ))),
        }
    }

    /// Probability of the most likely class
    pub fn peak(&self) -> f64 {
        self.failure.max(self.success)
    }
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Trait for classifier artifacts (ONNX, linear, ...)
pub trait Classifier: Send + Sync {
    /// Human-readable model kind for status output
    fn kind(&self) -> &'static str;

    /// Input width, when the artifact declares one
    fn n_features(&self) -> Option<usize>;

    fn predict_proba(&self, features: &[f64]) -> PredictResult<ClassProbabilities>;

    /// Most likely class: 1 for success, 0 for failure
    fn predict(&self, features: &[f64]) -> PredictResult<u8> {
        let probs = self.predict_proba(features)?;
        Ok(u8::from(probs.success > probs.failure))
    }
}

pub(crate) fn check_width(expected: Option<usize>, actual: usize) -> PredictResult<()> {
    match expected {
        Some(expected) if expected != actual => Err(PredictError::WidthMismatch {
            stage: "classifier",
            expected,
            actual,
        }),
        _ => Ok(()),
    }
}

// ============================================================================
// LINEAR IMPLEMENTATION
// ============================================================================

/// Logistic regression exported as JSON coefficients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearClassifier {
    pub fn from_json(text: &str) -> Result<Self, ArtifactError> {
        let model: Self =
            serde_json::from_str(text).map_err(|e| ArtifactError::Invalid(e.to_string()))?;
        if model.coefficients.is_empty() {
            return Err(ArtifactError::Invalid("classifier has no coefficients".to_string()));
        }
        Ok(model)
    }
}

impl Classifier for LinearClassifier {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn predict_proba(&self, features: &[f64]) -> PredictResult<ClassProbabilities> {
        check_width(self.n_features(), features.len())?;

        let logit: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;

        Ok(ClassProbabilities::from_success(sigmoid(logit)))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

// ============================================================================
// LOADING
// ============================================================================

/// Load a classifier, choosing the implementation by file extension
pub fn load_classifier(path: &Path) -> Result<Box<dyn Classifier>, ArtifactError> {
    log::info!("Loading classifier from: {}", path.display());

    if !path.exists() {
        return Err(ArtifactError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "model not found"),
        });
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => {
            let text = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let model = LinearClassifier::from_json(&text).map_err(|e| e.at(path))?;
            Ok(Box::new(model))
        }
        #[cfg(feature = "onnx")]
        Some("onnx") => Ok(Box::new(super::onnx::OnnxClassifier::load(path)?)),
        _ => Err(ArtifactError::Unsupported(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_output() {
        let pair = ClassProbabilities::from_output(&[0.9, 0.1]).unwrap();
        assert_eq!(pair.failure, 0.9);
        assert_eq!(pair.success, 0.1);

        let single = ClassProbabilities::from_output(&[0.25]).unwrap();
        assert_eq!(single.failure, 0.75);

        assert!(ClassProbabilities::from_output(&[]).is_err());
        assert!(ClassProbabilities::from_output(&[0.1, 0.2, 0.7]).is_err());
    }

    #[test]
    fn test_non_finite_output_rejected() {
        for values in [vec![f64::NAN, 0.5], vec![0.5, f64::INFINITY], vec![f64::NAN]] {
            let err = ClassProbabilities::from_output(&values).unwrap_err();
            assert!(matches!(err, PredictError::Inference(_)), "{:?}", values);
        }
    }

    #[test]
    fn test_peak() {
        assert_eq!(ClassProbabilities::from_output(&[0.999, 0.001]).unwrap().peak(), 0.999);
    }

    #[test]
    fn test_linear_zero_logit_is_even() {
        let model = LinearClassifier { coefficients: vec![0.0; 3], intercept: 0.0 };
        let probs = model.predict_proba(&[1.0, 2.0, 3.0]).unwrap();
        assert!((probs.success - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_linear_strong_negative_bias() {
        let model = LinearClassifier { coefficients: vec![0.0; 2], intercept: -10.0 };
        let probs = model.predict_proba(&[1.0, 1.0]).unwrap();
        assert!(probs.success < 0.01);
        assert_eq!(model.predict(&[1.0, 1.0]).unwrap(), 0);
    }

    #[test]
    fn test_linear_width_mismatch() {
        let model = LinearClassifier { coefficients: vec![1.0; 4], intercept: 0.0 };
        let err = model.predict_proba(&[1.0; 3]).unwrap_err();
        assert_eq!(
            err,
            PredictError::WidthMismatch { stage: "classifier", expected: 4, actual: 3 }
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.joblib");
        std::fs::write(&path, b"not a model").unwrap();

        assert!(matches!(load_classifier(&path), Err(ArtifactError::Unsupported(_))));
    }

    #[test]
    fn test_missing_classifier() {
        let result = load_classifier(Path::new("/nonexistent/classifier.json"));
        assert!(matches!(result, Err(ArtifactError::Io { .. })));
    }
}
