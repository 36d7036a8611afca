//! Categorical Encoding
//!
//! Maps the four free-text fields of a record to the integer indices the
//! classifier was trained with.
//!
//! Every lookup yields an [`EncodingOutcome`] so callers can tell an exact
//! training-consistent index from a degraded guess.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;

// ============================================================================
// FIELDS
// ============================================================================

/// The categorical fields, in vector order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    Gender,
    DepartmentArea,
    ContractType,
    SeniorityLevel,
}

impl CategoricalField {
    /// All fields in the order they are appended to the feature vector
    pub const ALL: [CategoricalField; 4] = [
        Self::Gender,
        Self::DepartmentArea,
        Self::ContractType,
        Self::SeniorityLevel,
    ];

    /// Key used in the encoder artifact and in API metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::DepartmentArea => "department_area",
            Self::ContractType => "contract_type",
            Self::SeniorityLevel => "seniority_level",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == key)
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// LABEL ENCODER
// ============================================================================

/// Label → index mapping fitted during training.
///
/// The index of a label is its position in the fitted class list.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, u32>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, ArtifactError> {
        let mut index = HashMap::with_capacity(classes.len());
        for (i, label) in classes.iter().enumerate() {
            if index.insert(label.clone(), i as u32).is_some() {
                return Err(ArtifactError::Invalid(format!(
                    "duplicate encoder class '{}'",
                    label
                )));
            }
        }
        Ok(Self { classes, index })
    }

    /// Index of a known label
    pub fn transform(&self, label: &str) -> Option<u32> {
        self.index.get(label).copied()
    }

    /// Label at an index
    pub fn inverse_transform(&self, index: u32) -> Option<&str> {
        self.classes.get(index as usize).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

// ============================================================================
// ENCODER SET
// ============================================================================

/// Encoders for every categorical field, loaded from one artifact.
///
/// Artifact format: `{"gender": ["F", "M"], "department_area": [...], ...}`.
/// All four fields must be present with at least one class each.
#[derive(Debug, Clone)]
pub struct CategoryEncoderSet {
    gender: LabelEncoder,
    department_area: LabelEncoder,
    contract_type: LabelEncoder,
    seniority_level: LabelEncoder,
}

impl CategoryEncoderSet {
    pub fn from_classes(
        mut classes: HashMap<CategoricalField, Vec<String>>,
    ) -> Result<Self, ArtifactError> {
        let mut take = |field: CategoricalField| -> Result<LabelEncoder, ArtifactError> {
            let labels = classes.remove(&field).ok_or_else(|| {
                ArtifactError::Invalid(format!("encoder set missing field '{}'", field))
            })?;
            if labels.is_empty() {
                return Err(ArtifactError::Invalid(format!(
                    "encoder for '{}' has no classes",
                    field
                )));
            }
            LabelEncoder::new(labels)
        };

        Ok(Self {
            gender: take(CategoricalField::Gender)?,
            department_area: take(CategoricalField::DepartmentArea)?,
            contract_type: take(CategoricalField::ContractType)?,
            seniority_level: take(CategoricalField::SeniorityLevel)?,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, ArtifactError> {
        let raw: HashMap<String, Vec<String>> =
            serde_json::from_str(text).map_err(|e| ArtifactError::Invalid(e.to_string()))?;

        let mut classes = HashMap::with_capacity(raw.len());
        for (key, labels) in raw {
            match CategoricalField::from_key(&key) {
                Some(field) => {
                    classes.insert(field, labels);
                }
                None => log::warn!("Ignoring encoder for unknown field '{}'", key),
            }
        }
        Self::from_classes(classes)
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let text = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|e| e.at(path))
    }

    pub fn get(&self, field: CategoricalField) -> &LabelEncoder {
        match field {
            CategoricalField::Gender => &self.gender,
            CategoricalField::DepartmentArea => &self.department_area,
            CategoricalField::ContractType => &self.contract_type,
            CategoricalField::SeniorityLevel => &self.seniority_level,
        }
    }
}

// ============================================================================
// ENCODING OUTCOME
// ============================================================================

/// Why a degraded encoding was used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The encoder artifact is not loaded
    EncodersUnavailable,
    /// Label unseen during training, lenient policy engaged
    UnseenLabel,
}

/// Result of encoding one categorical value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingOutcome {
    /// Exact, training-consistent index
    Matched(u32),
    /// Degraded index from the fallback table/hash
    FallbackApplied { index: u32, reason: FallbackReason },
    /// Label the loaded encoder cannot represent
    Rejected { label: String },
}

impl EncodingOutcome {
    pub fn index(&self) -> Option<u32> {
        match self {
            Self::Matched(index) | Self::FallbackApplied { index, .. } => Some(*index),
            Self::Rejected { .. } => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::FallbackApplied { .. })
    }
}

/// What to do with labels the loaded encoder has never seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingPolicy {
    /// Reject unseen labels as client errors
    #[default]
    Strict,
    /// Fall back on any encoder error and flag the result as degraded
    Lenient,
}

impl std::str::FromStr for EncodingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(format!("unknown encoding policy '{}'", other)),
        }
    }
}

/// Encode one value.
///
/// `encoders` is `None` when the artifact failed to load.
pub fn encode(
    encoders: Option<&CategoryEncoderSet>,
    policy: EncodingPolicy,
    field: CategoricalField,
    label: &str,
) -> EncodingOutcome {
    let Some(set) = encoders else {
        return fallback(field, label, FallbackReason::EncodersUnavailable);
    };
    match (set.get(field).transform(label), policy) {
        (Some(index), _) => EncodingOutcome::Matched(index),
        (None, EncodingPolicy::Lenient) => fallback(field, label, FallbackReason::UnseenLabel),
        (None, EncodingPolicy::Strict) => EncodingOutcome::Rejected {
            label: label.to_string(),
        },
    }
}

// ============================================================================
// FALLBACK POLICY
// ============================================================================

/// Hash buckets for department area
pub const DEPARTMENT_BUCKETS: u32 = 10;

/// Hash buckets for contract type
pub const CONTRACT_BUCKETS: u32 = 5;

/// Seniority used when the label is not in the table
pub const DEFAULT_SENIORITY_INDEX: u32 = 1;

const SENIORITY_TABLE: &[(&str, u32)] = &[("Junior", 0), ("Semi-Senior", 1), ("Senior", 2)];

fn fallback(field: CategoricalField, label: &str, reason: FallbackReason) -> EncodingOutcome {
    EncodingOutcome::FallbackApplied {
        index: fallback_index(field, label),
        reason,
    }
}

/// Degraded, non-training-consistent index for a label
pub fn fallback_index(field: CategoricalField, label: &str) -> u32 {
    match field {
        CategoricalField::Gender => u32::from(label.to_uppercase() == "F"),
        CategoricalField::DepartmentArea => bucket(label, DEPARTMENT_BUCKETS),
        CategoricalField::ContractType => bucket(label, CONTRACT_BUCKETS),
        CategoricalField::SeniorityLevel => SENIORITY_TABLE
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, index)| *index)
            .unwrap_or(DEFAULT_SENIORITY_INDEX),
    }
}

// CRC32 is stable across processes and platforms
fn bucket(label: &str, buckets: u32) -> u32 {
    crc32fast::hash(label.as_bytes()) % buckets
}

// ============================================================================
// TESTS
// ============================================================================
