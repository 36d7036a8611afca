//! Predictor - Artifact lifecycle and prediction pipeline
//!
//! Two phases:
//! 1. **Load**: scaler, then classifier, then encoders. Any required
//!    artifact failing leaves the predictor `Unavailable` for the process
//!    lifetime; a restart is needed after fixing the artifact.
//! 2. **Serve**: the artifact set is immutable and shared behind an `Arc`.
//!
//! Pipeline: record → assemble → scale → classify → calibrate.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::calibration::{CalibrationPolicy, CompositeRatings, PredictionResult};
use super::classifier::{load_classifier, Classifier};
use super::scaler::StandardScaler;
use crate::config::ArtifactConfig;
use crate::error::{ArtifactError, PredictError, PredictResult};
use crate::features::layout::{LayoutInfo, FEATURE_COUNT};
use crate::features::{assemble, CategoryEncoderSet, EncodingPolicy, FallbackNote, FeatureVector, OnboardingRecord};

// ============================================================================
// ARTIFACT SET
// ============================================================================

/// Model metadata captured at load time
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub classifier_kind: String,
    pub scaler_features: usize,
    pub encoders_loaded: bool,
    pub encoding_policy: EncodingPolicy,
    pub artifact_paths: Option<ArtifactPaths>,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactPaths {
    pub scaler: PathBuf,
    pub classifier: PathBuf,
    pub encoders: PathBuf,
}

/// Matched scaler + classifier + encoders
pub struct ArtifactSet {
    scaler: StandardScaler,
    classifier: Box<dyn Classifier>,
    encoders: Option<CategoryEncoderSet>,
    policy: EncodingPolicy,
    calibration: CalibrationPolicy,
    metadata: ModelMetadata,
}

impl ArtifactSet {
    /// Assemble from already-loaded artifacts
    pub fn new(
        scaler: StandardScaler,
        classifier: Box<dyn Classifier>,
        encoders: Option<CategoryEncoderSet>,
        policy: EncodingPolicy,
        calibration: CalibrationPolicy,
    ) -> Self {
        if scaler.n_features() != FEATURE_COUNT {
            log::warn!(
                "Scaler expects {} features but the layout produces {}; predictions will fail",
                scaler.n_features(),
                FEATURE_COUNT
            );
        }

        let metadata = ModelMetadata {
            classifier_kind: classifier.kind().to_string(),
            scaler_features: scaler.n_features(),
            encoders_loaded: encoders.is_some(),
            encoding_policy: policy,
            artifact_paths: None,
            loaded_at: Utc::now(),
        };

        Self {
            scaler,
            classifier,
            encoders,
            policy,
            calibration,
            metadata,
        }
    }

    /// Load every artifact named by the config, in scaler → classifier → encoders order
    pub fn load(config: &ArtifactConfig) -> Result<Self, ArtifactError> {
        let scaler = StandardScaler::load(&config.scaler_path)?;
        let classifier = load_classifier(&config.classifier_path)?;

        let encoders = match CategoryEncoderSet::load(&config.encoders_path) {
            Ok(encoders) => Some(encoders),
            Err(e) if config.require_encoders => return Err(e),
            Err(e) => {
                log::warn!("Encoders unavailable ({}), serving with fallback encodings", e);
                None
            }
        };

        let mut set = Self::new(
            scaler,
            classifier,
            encoders,
            config.encoding_policy,
            config.calibration.clone(),
        );
        set.metadata.artifact_paths = Some(ArtifactPaths {
            scaler: config.scaler_path.clone(),
            classifier: config.classifier_path.clone(),
            encoders: config.encoders_path.clone(),
        });
        Ok(set)
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Details that accompany every prediction
#[derive(Debug, Clone, Serialize)]
pub struct PredictionMetadata {
    /// P(success) as reported by the classifier
    pub raw_success_probability: f64,
    /// The composite rating score replaced the model probability
    pub calibration_applied: bool,
    /// At least one categorical used a non-training-consistent encoding
    pub degraded_encoding: bool,
    pub fallbacks: Vec<FallbackNote>,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub classifier: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    #[serde(flatten)]
    pub result: PredictionResult,
    pub metadata: PredictionMetadata,
}

// ============================================================================
// PREDICTOR
// ============================================================================

enum PredictorState {
    Ready(ArtifactSet),
    Unavailable { reason: String },
}

/// Process-wide predictor, cheap to clone
#[derive(Clone)]
pub struct Predictor {
    state: Arc<PredictorState>,
}

/// Availability snapshot for status endpoints
#[derive(Debug, Clone, Serialize)]
pub struct PredictorStatus {
    pub available: bool,
    pub reason: Option<String>,
    pub model: Option<ModelMetadata>,
    pub layout: LayoutInfo,
}

impl Predictor {
    /// Load artifacts; failures produce an unavailable predictor
    pub fn load(config: &ArtifactConfig) -> Self {
        match ArtifactSet::load(config) {
            Ok(set) => {
                log::info!(
                    "Predictor ready ({} classifier, encoders loaded: {})",
                    set.metadata.classifier_kind,
                    set.metadata.encoders_loaded
                );
                Self::ready(set)
            }
            Err(e) => {
                log::error!("Predictor unavailable: {}", e);
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn ready(set: ArtifactSet) -> Self {
        Self {
            state: Arc::new(PredictorState::Ready(set)),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: Arc::new(PredictorState::Unavailable {
                reason: reason.into(),
            }),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(*self.state, PredictorState::Ready(_))
    }

    pub fn status(&self) -> PredictorStatus {
        let (available, reason, model) = match &*self.state {
            PredictorState::Ready(set) => (true, None, Some(set.metadata.clone())),
            PredictorState::Unavailable { reason } => (false, Some(reason.clone()), None),
        };

        PredictorStatus {
            available,
            reason,
            model,
            layout: LayoutInfo::current(),
        }
    }

    /// Score one validated record
    pub fn predict(&self, record: &OnboardingRecord) -> PredictResult<Prediction> {
        let set = match &*self.state {
            PredictorState::Ready(set) => set,
            PredictorState::Unavailable { reason } => {
                return Err(PredictError::Unavailable {
                    reason: reason.clone(),
                });
            }
        };

        let assembled = assemble(record, set.encoders.as_ref(), set.policy)?;

        let scaled = set
            .scaler
            .transform(assembled.vector.as_slice())
            .map_err(|e| log_width_mismatch(e, &assembled.vector))?;

        let raw = set
            .classifier
            .predict_proba(&scaled)
            .map_err(|e| log_width_mismatch(e, &assembled.vector))?;

        let calibrated = set.calibration.apply(raw, &CompositeRatings::from(record));
        if calibrated.overridden {
            log::debug!(
                "Composite score applied (raw P(success) = {:.6}, probability = {})",
                raw.success,
                calibrated.result.probability
            );
        }

        Ok(Prediction {
            result: calibrated.result,
            metadata: PredictionMetadata {
                raw_success_probability: raw.success,
                calibration_applied: calibrated.overridden,
                degraded_encoding: assembled.is_degraded(),
                fallbacks: assembled.fallbacks,
                feature_version: assembled.vector.version,
                layout_hash: assembled.vector.layout_hash,
                classifier: set.metadata.classifier_kind.clone(),
            },
        })
    }
}

fn log_width_mismatch(err: PredictError, vector: &FeatureVector) -> PredictError {
    if let PredictError::WidthMismatch { stage, expected, actual } = &err {
        log::error!(
            "Training/serving skew: {} expects {} features, record produced {}",
            stage,
            expected,
            actual
        );
        log::debug!("Rejected feature vector: {}", vector.to_log_entry());
    }
    err
}
