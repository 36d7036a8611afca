//! Onboarding success predictor
//!
//! Turns a structured onboarding record into a fixed-order feature vector,
//! scales it, classifies it with a pre-trained model and applies the
//! calibration policy to produce a bounded, categorized success score.
//!
//! ```text
//! OnboardingRecord ──► features::assemble ──► StandardScaler ──► Classifier
//!                                                                   │
//!            PredictionResult ◄── CalibrationPolicy ◄───────────────┘
//! ```
//!
//! Artifacts are loaded once through [`Predictor::load`] and shared
//! read-only afterwards.

pub mod config;
pub mod error;
pub mod features;
pub mod model;

pub use config::ArtifactConfig;
pub use error::{ArtifactError, PredictError, PredictResult};
pub use features::{CategoricalField, EncodingPolicy, FeatureVector, OnboardingRecord};
pub use model::{Category, Prediction, PredictionResult, Predictor, PredictorStatus};
