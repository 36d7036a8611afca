//! Feature Vector - Core data structure for ML input
//!
//! **Versioned feature vector with layout validation**
//!
//! Uses the centralized layout from `layout.rs` for ordering, version
//! tracking and the layout hash.

use serde::Serialize;

use super::encoding::{encode, CategoricalField, CategoryEncoderSet, EncodingOutcome, EncodingPolicy, FallbackReason};
use super::layout::{layout_hash, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, NUMERIC_FEATURE_COUNT};
use super::record::OnboardingRecord;
use crate::error::{PredictError, PredictResult};

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned Feature Vector with layout metadata
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Numeric head of the vector
    pub fn numeric(&self) -> &[f64] {
        &self.values[..NUMERIC_FEATURE_COUNT]
    }

    /// Encoded categorical tail of the vector
    pub fn categorical(&self) -> &[f64] {
        &self.values[NUMERIC_FEATURE_COUNT..]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        super::layout::feature_index(name).and_then(|i| self.get(i))
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "values": self.values.to_vec(),
            "named_values": FEATURE_LAYOUT.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::HashMap<_, _>>(),
        })
    }
}

// ============================================================================
// ASSEMBLY
// ============================================================================

/// A categorical field that was encoded with the degraded fallback
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackNote {
    pub field: CategoricalField,
    pub label: String,
    pub index: u32,
    pub reason: FallbackReason,
}

/// Output of feature assembly
#[derive(Debug, Clone)]
pub struct AssembledFeatures {
    pub vector: FeatureVector,
    /// Empty when every categorical was matched exactly
    pub fallbacks: Vec<FallbackNote>,
}

impl AssembledFeatures {
    pub fn is_degraded(&self) -> bool {
        !self.fallbacks.is_empty()
    }
}

/// Build the model input for a record.
///
/// Layout: `[30 numeric fields][gender, area, contract, seniority]`.
pub fn assemble(
    record: &OnboardingRecord,
    encoders: Option<&CategoryEncoderSet>,
    policy: EncodingPolicy,
) -> PredictResult<AssembledFeatures> {
    let mut values = [0.0f64; FEATURE_COUNT];
    values[..NUMERIC_FEATURE_COUNT].copy_from_slice(&record.numeric_features());

    let mut fallbacks = Vec::new();
    for (offset, field) in CategoricalField::ALL.into_iter().enumerate() {
        let label = record.categorical(field);
        let index = match encode(encoders, policy, field, label) {
            EncodingOutcome::Matched(index) => index,
            EncodingOutcome::FallbackApplied { index, reason } => {
                fallbacks.push(FallbackNote {
                    field,
                    label: label.to_string(),
                    index,
                    reason,
                });
                index
            }
            EncodingOutcome::Rejected { label } => {
                return Err(PredictError::UnrecognizedCategory { field, label });
            }
        };
        values[NUMERIC_FEATURE_COUNT + offset] = index as f64;
    }

    Ok(AssembledFeatures {
        vector: FeatureVector::from_values(values),
        fallbacks,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::record::sample_record;

    #[test]
    fn test_vector_metadata() {
        let vector = FeatureVector::from_values([0.0; FEATURE_COUNT]);
        assert_eq!(vector.version, FEATURE_VERSION);
        assert_eq!(vector.layout_hash, layout_hash());
        assert_eq!(vector.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_get_by_name() {
        let mut values = [0.0; FEATURE_COUNT];
        values[14] = 4.3;
        let vector = FeatureVector::from_values(values);
        assert_eq!(vector.get_by_name("leader_satisfaction"), Some(4.3));
        assert_eq!(vector.get_by_name("nonexistent"), None);
    }

    #[test]
    fn test_assemble_without_encoders_is_degraded() {
        let record = sample_record();
        let assembled = assemble(&record, None, EncodingPolicy::Strict).unwrap();

        assert!(assembled.is_degraded());
        assert_eq!(assembled.fallbacks.len(), 4);
        // gender "M" → 0, seniority "Semi-Senior" → 1
        assert_eq!(assembled.vector.get(30), Some(0.0));
        assert_eq!(assembled.vector.get(33), Some(1.0));
    }

    #[test]
    fn test_to_log_entry() {
        let record = sample_record();
        let assembled = assemble(&record, None, EncodingPolicy::Strict).unwrap();
        let log = assembled.vector.to_log_entry();

        assert_eq!(log["feature_version"], FEATURE_VERSION);
        assert_eq!(log["values"].as_array().map(|v| v.len()), Some(FEATURE_COUNT));
        assert_eq!(log["named_values"]["age"], 28.0);
    }
}
