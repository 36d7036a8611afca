//! Onboarding Record - Structured prediction input
//!
//! One record per prediction request. Range constraints are declared here
//! and checked by the caller with [`validator::Validate`] before the record
//! reaches feature assembly.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::encoding::CategoricalField;
use super::layout::NUMERIC_FEATURE_COUNT;

/// Fully described onboarding history of one employee.
///
/// Boolean facts are carried as `0`/`1` integers, the way the training
/// data encodes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OnboardingRecord {
    // === Recruitment ===
    #[validate(range(min = 18, max = 100))]
    pub age: u32,
    #[validate(range(min = 0.0, max = 60.0))]
    pub prior_experience_years: f64,
    #[validate(range(max = 365))]
    pub recruiting_process_days: u32,
    #[validate(range(max = 50))]
    pub interview_count: u32,
    #[validate(range(min = 0.0, max = 5.0))]
    pub interview_rating: f64,
    #[validate(range(max = 1))]
    pub initial_offer_accepted: u8,

    // === Induction ===
    #[validate(range(max = 1))]
    pub induction_attended: u8,
    #[validate(range(min = 0.0, max = 5.0))]
    pub induction_score: f64,
    #[validate(range(max = 1))]
    pub materials_delivered: u8,
    #[validate(range(max = 1))]
    pub welcome_session_attended: u8,

    // === Integration ===
    #[validate(range(max = 365))]
    pub days_to_first_project: u32,
    #[validate(range(max = 1))]
    pub mentor_assigned: u8,
    #[validate(range(max = 500))]
    pub team_meetings_held: u32,
    #[validate(range(max = 500))]
    pub integration_activities: u32,
    #[validate(range(min = 0.0, max = 5.0))]
    pub leader_satisfaction: f64,
    #[validate(range(min = 0.0, max = 5.0))]
    pub team_compatibility: f64,

    // === Training ===
    #[validate(range(min = 0.0, max = 2000.0))]
    pub training_hours: f64,
    #[validate(range(max = 500))]
    pub courses_completed: u32,
    #[validate(range(min = 0.0, max = 100.0))]
    pub technical_evaluation: f64,
    #[validate(range(max = 1))]
    pub formal_training_plan: u8,
    #[validate(range(min = 0.0, max = 100.0))]
    pub tools_knowledge: f64,

    // === Surveys ===
    #[validate(range(min = 0.0, max = 5.0))]
    pub recruiting_satisfaction: f64,
    #[validate(range(min = 0.0, max = 5.0))]
    pub induction_satisfaction: f64,
    #[validate(range(min = 0.0, max = 5.0))]
    pub integration_satisfaction: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub first_month_nps: f64,
    #[validate(range(max = 1000))]
    pub feedback_count: u32,

    // === Social ===
    #[validate(range(min = 1, max = 1000))]
    pub team_size: u32,
    #[validate(range(max = 1000))]
    pub event_participation: u32,
    #[validate(range(max = 100000))]
    pub professional_network_connections: u32,
    #[validate(range(max = 100000))]
    pub internal_community_interactions: u32,

    // === Categoricals ===
    #[validate(length(min = 1, max = 64))]
    pub gender: String,
    #[validate(length(min = 1, max = 64))]
    pub department_area: String,
    #[validate(length(min = 1, max = 64))]
    pub contract_type: String,
    #[validate(length(min = 1, max = 64))]
    pub seniority_level: String,
}

impl OnboardingRecord {
    /// Numeric sub-vector in canonical layout order (indices 0..30).
    pub fn numeric_features(&self) -> [f64; NUMERIC_FEATURE_COUNT] {
        [
            self.age as f64,
            self.prior_experience_years,
            self.recruiting_process_days as f64,
            self.interview_count as f64,
            self.interview_rating,
            self.initial_offer_accepted as f64,
            self.induction_attended as f64,
            self.induction_score,
            self.materials_delivered as f64,
            self.welcome_session_attended as f64,
            self.days_to_first_project as f64,
            self.mentor_assigned as f64,
            self.team_meetings_held as f64,
            self.integration_activities as f64,
            self.leader_satisfaction,
            self.team_compatibility,
            self.training_hours,
            self.courses_completed as f64,
            self.technical_evaluation,
            self.formal_training_plan as f64,
            self.tools_knowledge,
            self.recruiting_satisfaction,
            self.induction_satisfaction,
            self.integration_satisfaction,
            self.first_month_nps,
            self.feedback_count as f64,
            self.team_size as f64,
            self.event_participation as f64,
            self.professional_network_connections as f64,
            self.internal_community_interactions as f64,
        ]
    }

    /// Raw label of a categorical field
    pub fn categorical(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::Gender => &self.gender,
            CategoricalField::DepartmentArea => &self.department_area,
            CategoricalField::ContractType => &self.contract_type,
            CategoricalField::SeniorityLevel => &self.seniority_level,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_record() -> OnboardingRecord {
    OnboardingRecord {
        age: 28,
        prior_experience_years: 3.0,
        recruiting_process_days: 20,
        interview_count: 2,
        interview_rating: 4.2,
        initial_offer_accepted: 1,
        induction_attended: 1,
        induction_score: 4.1,
        materials_delivered: 1,
        welcome_session_attended: 1,
        days_to_first_project: 5,
        mentor_assigned: 1,
        team_meetings_held: 4,
        integration_activities: 6,
        leader_satisfaction: 4.3,
        team_compatibility: 4.5,
        training_hours: 35.0,
        courses_completed: 5,
        technical_evaluation: 78.0,
        formal_training_plan: 1,
        tools_knowledge: 72.0,
        recruiting_satisfaction: 4.5,
        induction_satisfaction: 4.3,
        integration_satisfaction: 4.2,
        first_month_nps: 8.0,
        feedback_count: 12,
        team_size: 8,
        event_participation: 5,
        professional_network_connections: 25,
        internal_community_interactions: 12,
        gender: "M".to_string(),
        department_area: "IT".to_string(),
        contract_type: "Indefinido".to_string(),
        seniority_level: "Semi-Senior".to_string(),
    }
}
