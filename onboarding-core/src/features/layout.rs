//! Feature Layout - Training column order
//!
//! The scaler and the classifier index features positionally, so the
//! order below is the order the model was trained on: 30 numeric
//! columns followed by the 4 label-encoded categoricals.
//!
//! Adding, removing or reordering a column bumps `FEATURE_VERSION` and
//! needs a freshly trained, matched artifact set (scaler, classifier,
//! encoders).

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Layout version recorded with every prediction
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT
// ============================================================================

/// Column names, vector position = slice position
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Recruitment (0-5) ===
    "age",                              // 0
    "prior_experience_years",           // 1
    "recruiting_process_days",          // 2
    "interview_count",                  // 3
    "interview_rating",                 // 4: 0-5
    "initial_offer_accepted",           // 5: 0/1

    // === Induction (6-9) ===
    "induction_attended",               // 6: 0/1
    "induction_score",                  // 7: 0-5
    "materials_delivered",              // 8: 0/1
    "welcome_session_attended",         // 9: 0/1

    // === Integration (10-15) ===
    "days_to_first_project",            // 10
    "mentor_assigned",                  // 11: 0/1
    "team_meetings_held",               // 12
    "integration_activities",           // 13
    "leader_satisfaction",              // 14: 0-5
    "team_compatibility",               // 15: 0-5

    // === Training (16-20) ===
    "training_hours",                   // 16
    "courses_completed",                // 17
    "technical_evaluation",             // 18: 0-100
    "formal_training_plan",             // 19: 0/1
    "tools_knowledge",                  // 20: 0-100

    // === Surveys (21-25) ===
    "recruiting_satisfaction",          // 21: 0-5
    "induction_satisfaction",           // 22: 0-5
    "integration_satisfaction",         // 23: 0-5
    "first_month_nps",                  // 24: 0-10
    "feedback_count",                   // 25

    // === Social (26-29) ===
    "team_size",                        // 26
    "event_participation",              // 27
    "professional_network_connections", // 28
    "internal_community_interactions",  // 29

    // === Encoded categoricals (30-33) ===
    "gender",                           // 30
    "department_area",                  // 31
    "contract_type",                    // 32
    "seniority_level",                  // 33
];

/// Number of numeric/boolean features at the head of the vector
pub const NUMERIC_FEATURE_COUNT: usize = 30;

/// Number of encoded categorical features at the tail of the vector
pub const CATEGORICAL_FEATURE_COUNT: usize = 4;

/// Width of the assembled vector
pub const FEATURE_COUNT: usize = NUMERIC_FEATURE_COUNT + CATEGORICAL_FEATURE_COUNT;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over the version byte and the NUL-separated column names
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);
    FEATURE_LAYOUT.iter().for_each(|name| {
        hasher.update(name.as_bytes());
        hasher.update(b"\0");
    });
    hasher.finalize()
}

/// Get layout hash
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for status endpoints and logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Check artifact-supplied feature names against the layout.
///
/// Returns the first position whose name differs, if any.
pub fn first_name_mismatch(names: &[String]) -> Option<usize> {
    if names.len() != FEATURE_COUNT {
        return Some(names.len().min(FEATURE_COUNT));
    }
    names
        .iter()
        .zip(FEATURE_LAYOUT.iter())
        .position(|(given, expected)| given != expected)
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Position of a column, by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Column name at a position
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================
