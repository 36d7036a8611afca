//! Standard Scaler
//!
//! Per-feature centering and scaling with statistics fitted at training
//! time: `(x - mean) / scale`.

use std::path::Path;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, PredictError, PredictResult};
use crate::features::layout::first_name_mismatch;

/// Serialized scaler statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    /// Column names seen at fit time, when the pipeline recorded them
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

/// Fitted scaler
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn new(params: ScalerParams) -> Result<Self, ArtifactError> {
        if params.mean.is_empty() {
            return Err(ArtifactError::Invalid("scaler has no features".to_string()));
        }
        if params.mean.len() != params.scale.len() {
            return Err(ArtifactError::Invalid(format!(
                "scaler mean has {} entries but scale has {}",
                params.mean.len(),
                params.scale.len()
            )));
        }
        if let Some(names) = &params.feature_names {
            if let Some(position) = first_name_mismatch(names) {
                return Err(ArtifactError::Invalid(format!(
                    "scaler feature names diverge from layout at position {}",
                    position
                )));
            }
        }

        // Constant columns are fitted with a zero scale; divide by 1 instead
        let scale = params
            .scale
            .into_iter()
            .map(|s| if s == 0.0 || !s.is_finite() { 1.0 } else { s })
            .collect::<Vec<_>>();

        Ok(Self {
            mean: Array1::from(params.mean),
            scale: Array1::from(scale),
        })
    }

    pub fn from_json(text: &str) -> Result<Self, ArtifactError> {
        let params: ScalerParams =
            serde_json::from_str(text).map_err(|e| ArtifactError::Invalid(e.to_string()))?;
        Self::new(params)
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        log::info!("Loading scaler from: {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|e| e.at(path))
    }

    /// Number of features the scaler was fitted on
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, features: &[f64]) -> PredictResult<Vec<f64>> {
        if features.len() != self.n_features() {
            return Err(PredictError::WidthMismatch {
                stage: "scaler",
                expected: self.n_features(),
                actual: features.len(),
            });
        }

        let input = Array1::from(features.to_vec());
        let scaled = (input - &self.mean) / &self.scale;
        Ok(scaled.to_vec())
    }
}
