//! Artifact configuration
//!
//! Where the matched artifact set lives and how the predictor treats it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::features::EncodingPolicy;
use crate::model::calibration::CalibrationPolicy;

/// Default artifact file names inside the model directory
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";
pub const DEFAULT_CLASSIFIER_FILE: &str = "classifier.onnx";
pub const DEFAULT_ENCODERS_FILE: &str = "encoders.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    pub scaler_path: PathBuf,
    pub classifier_path: PathBuf,
    pub encoders_path: PathBuf,

    /// Unseen-label handling when encoders are loaded
    pub encoding_policy: EncodingPolicy,

    /// Treat an encoder load failure as fatal.
    /// When false the predictor serves with fallback encodings.
    pub require_encoders: bool,

    pub calibration: CalibrationPolicy,
}

impl ArtifactConfig {
    /// Default file names under one directory
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            scaler_path: dir.join(DEFAULT_SCALER_FILE),
            classifier_path: dir.join(DEFAULT_CLASSIFIER_FILE),
            encoders_path: dir.join(DEFAULT_ENCODERS_FILE),
            encoding_policy: EncodingPolicy::default(),
            require_encoders: true,
            calibration: CalibrationPolicy::default(),
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self::from_dir("models")
    }
}
