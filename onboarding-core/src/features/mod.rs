//! Features Module - Feature Assembly
//!
//! Turns an onboarding record into the fixed-order vector the scaler and
//! classifier consume.

pub mod layout;
pub mod record;
pub mod encoding;
pub mod vector;


// Re-export common types
pub use layout::{LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, NUMERIC_FEATURE_COUNT};
pub use record::OnboardingRecord;
pub use encoding::{
    CategoricalField, CategoryEncoderSet, EncodingOutcome, EncodingPolicy, FallbackReason, LabelEncoder,
};
pub use vector::{assemble, AssembledFeatures, FallbackNote, FeatureVector};
