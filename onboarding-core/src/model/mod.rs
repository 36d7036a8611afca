//! Model Module - Scaling, classification and calibration
//!
//! Keeps inference separate from feature assembly so the classifier
//! artifact can be swapped (ONNX, linear) without touching the layout.

pub mod scaler;
pub mod classifier;
pub mod calibration;
pub mod predictor;
#[cfg(feature = "onnx")]
pub mod onnx;

#[cfg(test)]
mod tests;

// Re-export common types
pub use scaler::{ScalerParams, StandardScaler};
pub use classifier::{load_classifier, ClassProbabilities, Classifier, LinearClassifier};
pub use calibration::{CalibrationPolicy, Category, CompositeRatings, PredictionResult};
pub use predictor::{ArtifactSet, ModelMetadata, Prediction, PredictionMetadata, Predictor, PredictorStatus};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
