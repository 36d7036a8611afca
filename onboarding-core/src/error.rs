//! Error types
//!
//! `ArtifactError` belongs to the load phase and makes the predictor
//! unavailable. `PredictError` is returned per request.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::features::CategoricalField;

/// Failure while loading a scaler, classifier or encoder artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed artifact {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("invalid artifact: {0}")]
    Invalid(String),

    #[error("unsupported classifier artifact: {}", .0.display())]
    Unsupported(PathBuf),

    #[error("ONNX runtime error: {0}")]
    Onnx(String),
}

impl ArtifactError {
    /// Attach the artifact path to a content error
    pub fn at(self, path: &Path) -> Self {
        match self {
            Self::Invalid(reason) => Self::Malformed {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        }
    }
}

/// Failure of a single prediction request
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PredictError {
    #[error("prediction model unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("unrecognized {field} value '{label}'")]
    UnrecognizedCategory {
        field: CategoricalField,
        label: String,
    },

    #[error("feature width mismatch: {stage} expects {expected} features, got {actual}")]
    WidthMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("inference failed: {0}")]
    Inference(String),
}

pub type PredictResult<T> = Result<T, PredictError>;
