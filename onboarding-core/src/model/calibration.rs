//! Calibration & Categorization
//!
//! The trained classifier is biased toward class 0 and reports P(success)
//! close to zero for most inputs. Below a trigger threshold the model's
//! probability is replaced by a composite of four onboarding ratings; the
//! override is explicit and reported in the prediction metadata.
//!
//! An all-zero rating set yields probability 0 and "Low". This is a
//! model-bias workaround living in business logic; revisit it together
//! with the model, not in isolation.

use serde::{Deserialize, Serialize};

use super::classifier::ClassProbabilities;
use crate::features::OnboardingRecord;

/// Upper bound (exclusive) of the Low band
pub const LOW_UPPER_BOUND: f64 = 0.33;

/// Lower bound (inclusive) of the High band
pub const HIGH_LOWER_BOUND: f64 = 0.66;

pub const PROBABILITY_DECIMALS: u32 = 4;
pub const CONFIDENCE_DECIMALS: u32 = 2;

// ============================================================================
// CATEGORY
// ============================================================================

/// Onboarding success band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Low,
    Medium,
    High,
}

impl Category {
    /// Half-open bands; the top band is closed at 1.0
    pub fn from_probability(probability: f64) -> Self {
        if probability < LOW_UPPER_BOUND {
            Self::Low
        } else if probability < HIGH_LOWER_BOUND {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// POLICY
// ============================================================================

/// The four ratings (nominal 0-5 scale) behind the composite score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeRatings {
    pub leader_satisfaction: f64,
    pub team_compatibility: f64,
    pub interview_rating: f64,
    pub induction_score: f64,
}

impl CompositeRatings {
    pub fn mean(&self) -> f64 {
        (self.leader_satisfaction + self.team_compatibility + self.interview_rating + self.induction_score)
            / 4.0
    }
}

impl From<&OnboardingRecord> for CompositeRatings {
    fn from(record: &OnboardingRecord) -> Self {
        Self {
            leader_satisfaction: record.leader_satisfaction,
            team_compatibility: record.team_compatibility,
            interview_rating: record.interview_rating,
            induction_score: record.induction_score,
        }
    }
}

/// Calibration constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationPolicy {
    /// Raw P(success) strictly below this engages the composite score
    pub trigger_below: f64,
    /// Confidence reported when the model output is accepted as-is
    pub accepted_confidence: f64,
    /// Nominal maximum of the composite ratings
    pub rating_scale: f64,
}

impl Default for CalibrationPolicy {
    fn default() -> Self {
        Self {
            trigger_below: 0.01,
            accepted_confidence: 75.0,
            rating_scale: 5.0,
        }
    }
}

/// Final, rounded score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// 0.0 - 1.0, 4 decimals
    pub probability: f64,
    pub category: Category,
    /// 0 - 100, 2 decimals
    pub confidence: f64,
}

/// Calibration output with the override flag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibrated {
    pub result: PredictionResult,
    /// True when the composite score replaced the model probability
    pub overridden: bool,
}

impl CalibrationPolicy {
    pub fn triggers(&self, raw_success: f64) -> bool {
        raw_success < self.trigger_below
    }

    /// Composite score: mean rating normalized to 0-1
    pub fn composite_score(&self, ratings: &CompositeRatings) -> f64 {
        (ratings.mean() / self.rating_scale).clamp(0.0, 1.0)
    }

    /// Score, categorize, then round.
    ///
    /// The category comes from the unrounded probability, so a value just
    /// under a band edge keeps its lower band even when it rounds onto the edge.
    pub fn apply(&self, raw: ClassProbabilities, ratings: &CompositeRatings) -> Calibrated {
        let overridden = self.triggers(raw.success);

        let (probability, confidence) = if overridden {
            (self.composite_score(ratings), 100.0 * raw.peak())
        } else {
            (raw.success, self.accepted_confidence)
        };

        let category = Category::from_probability(probability);

        Calibrated {
            result: PredictionResult {
                probability: round_to(probability, PROBABILITY_DECIMALS),
                category,
                confidence: round_to(confidence, CONFIDENCE_DECIMALS),
            },
            overridden,
        }
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings(l: f64, c: f64, i: f64, s: f64) -> CompositeRatings {
        CompositeRatings {
            leader_satisfaction: l,
            team_compatibility: c,
            interview_rating: i,
            induction_score: s,
        }
    }

    fn has_at_most_decimals(value: f64, decimals: u32) -> bool {
        let factor = 10f64.powi(decimals as i32);
        let scaled = value * factor;
        (scaled - scaled.round()).abs() < 1e-6
    }

    #[test]
    fn test_threshold_boundary() {
        let policy = CalibrationPolicy::default();
        assert!(policy.triggers(0.009999));
        assert!(!policy.triggers(0.01));
    }

    #[test]
    fn test_accepted_output_uses_placeholder_confidence() {
        let policy = CalibrationPolicy::default();
        let calibrated = policy.apply(ClassProbabilities::from_success(0.01), &ratings(0.0, 0.0, 0.0, 0.0));

        assert!(!calibrated.overridden);
        assert_eq!(calibrated.result.probability, 0.01);
        assert_eq!(calibrated.result.confidence, 75.0);
        assert_eq!(calibrated.result.category, Category::Low);
    }

    #[test]
    fn test_composite_replaces_degenerate_output() {
        let policy = CalibrationPolicy::default();
        let raw = ClassProbabilities { failure: 0.999, success: 0.001 };
        let calibrated = policy.apply(raw, &ratings(4.3, 4.5, 4.2, 4.1));

        assert!(calibrated.overridden);
        assert_eq!(calibrated.result.probability, 0.855);
        assert_eq!(calibrated.result.category, Category::High);
        assert_eq!(calibrated.result.confidence, 99.9);
    }

    #[test]
    fn test_just_below_threshold_triggers() {
        let policy = CalibrationPolicy::default();
        let raw = ClassProbabilities::from_success(0.009999);
        let calibrated = policy.apply(raw, &ratings(2.5, 2.5, 2.5, 2.5));

        assert!(calibrated.overridden);
        assert_eq!(calibrated.result.probability, 0.5);
        assert_eq!(calibrated.result.category, Category::Medium);
        assert_eq!(calibrated.result.confidence, 99.0);
    }

    #[test]
    fn test_all_zero_ratings_yield_low() {
        let policy = CalibrationPolicy::default();
        let calibrated = policy.apply(ClassProbabilities::from_success(0.0), &ratings(0.0, 0.0, 0.0, 0.0));

        assert_eq!(calibrated.result.probability, 0.0);
        assert_eq!(calibrated.result.category, Category::Low);
        assert_eq!(calibrated.result.confidence, 100.0);
    }

    #[test]
    fn test_composite_clamped_to_one() {
        let policy = CalibrationPolicy::default();
        assert_eq!(policy.composite_score(&ratings(7.0, 9.0, 6.0, 8.0)), 1.0);
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(Category::from_probability(0.0), Category::Low);
        assert_eq!(Category::from_probability(0.329999), Category::Low);
        assert_eq!(Category::from_probability(0.33), Category::Medium);
        assert_eq!(Category::from_probability(0.659999), Category::Medium);
        assert_eq!(Category::from_probability(0.66), Category::High);
        assert_eq!(Category::from_probability(1.0), Category::High);
    }

    #[test]
    fn test_rounding() {
        let policy = CalibrationPolicy::default();
        let raw = ClassProbabilities { failure: 0.876543219, success: 0.123456781 };
        let calibrated = policy.apply(raw, &ratings(1.0, 1.0, 1.0, 1.0));

        assert_eq!(calibrated.result.probability, 0.1235);
        assert!(has_at_most_decimals(calibrated.result.probability, 4));
        assert!(has_at_most_decimals(calibrated.result.confidence, 2));

        let raw = ClassProbabilities { failure: 0.9876543, success: 0.0023457 };
        let calibrated = policy.apply(raw, &ratings(1.1, 2.3, 3.7, 4.9));
        assert!(calibrated.overridden);
        assert_eq!(calibrated.result.confidence, 98.77);
        assert!(has_at_most_decimals(calibrated.result.probability, 4));
    }

    #[test]
    fn test_category_taken_before_rounding() {
        let policy = CalibrationPolicy::default();

        let calibrated = policy.apply(ClassProbabilities::from_success(0.329996), &ratings(0.0, 0.0, 0.0, 0.0));
        assert!(!calibrated.overridden);
        assert_eq!(calibrated.result.probability, 0.33);
        assert_eq!(calibrated.result.category, Category::Low);

        let calibrated = policy.apply(ClassProbabilities::from_success(0.659996), &ratings(0.0, 0.0, 0.0, 0.0));
        assert_eq!(calibrated.result.probability, 0.66);
        assert_eq!(calibrated.result.category, Category::Medium);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.85500001, 4), 0.855);
        assert_eq!(round_to(99.876, 2), 99.88);
        assert_eq!(round_to(75.0, 2), 75.0);
    }
}
