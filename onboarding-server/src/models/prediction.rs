//! Stored prediction model

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use onboarding_core::{OnboardingRecord, Prediction};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StoredPrediction {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub probability: f64,
    pub category: String,
    pub confidence: f64,
    pub raw_success_probability: f64,
    pub calibration_applied: bool,
    pub degraded_encoding: bool,
    pub feature_version: i16,
    pub layout_hash: i64,
    pub input_hash: String,
    #[serde(skip_serializing)]
    pub input: sqlx::types::Json<OnboardingRecord>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Prediction request: an optional employee plus the full record
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub employee_id: Option<Uuid>,
    #[serde(flatten)]
    pub record: OnboardingRecord,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Set when the prediction was stored against an employee
    pub prediction_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    #[serde(flatten)]
    pub prediction: Prediction,
}

#[derive(Debug, Deserialize)]
pub struct PredictionQuery {
    pub employee_id: Option<Uuid>,
    pub limit: Option<i64>,
}

/// SHA-256 of the record's canonical JSON form
pub fn input_hash(record: &OnboardingRecord) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(record)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

impl StoredPrediction {
    pub async fn create(
        pool: &PgPool,
        employee_id: Uuid,
        record: &OnboardingRecord,
        prediction: &Prediction,
        created_by: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let hash = input_hash(record).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        sqlx::query_as::<_, StoredPrediction>(
            r#"
            INSERT INTO predictions (
                employee_id, probability, category, confidence, raw_success_probability,
                calibration_applied, degraded_encoding, feature_version, layout_hash,
                input_hash, input, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#
        )
        .bind(employee_id)
        .bind(prediction.result.probability)
        .bind(prediction.result.category.as_str())
        .bind(prediction.result.confidence)
        .bind(prediction.metadata.raw_success_probability)
        .bind(prediction.metadata.calibration_applied)
        .bind(prediction.metadata.degraded_encoding)
        .bind(prediction.metadata.feature_version as i16)
        .bind(prediction.metadata.layout_hash as i64)
        .bind(hash)
        .bind(sqlx::types::Json(record))
        .bind(created_by)
        .fetch_one(pool)
        .await
    }

    pub async fn list(pool: &PgPool, employee_id: Option<Uuid>, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, StoredPrediction>(
            r#"
            SELECT * FROM predictions
            WHERE ($1::uuid IS NULL OR employee_id = $1)
            ORDER BY created_at DESC
            LIMIT $2
            "#
        )
        .bind(employee_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
pub(crate) fn sample_record_json() -> serde_json::Value {
    serde_json::json!({
        "age": 28, "prior_experience_years": 3.0, "recruiting_process_days": 20,
        "interview_count": 2, "interview_rating": 4.2, "initial_offer_accepted": 1,
        "induction_attended": 1, "induction_score": 4.1, "materials_delivered": 1,
        "welcome_session_attended": 1, "days_to_first_project": 5, "mentor_assigned": 1,
        "team_meetings_held": 4, "integration_activities": 6, "leader_satisfaction": 4.3,
        "team_compatibility": 4.5, "training_hours": 35.0, "courses_completed": 5,
        "technical_evaluation": 78.0, "formal_training_plan": 1, "tools_knowledge": 72.0,
        "recruiting_satisfaction": 4.5, "induction_satisfaction": 4.3,
        "integration_satisfaction": 4.2, "first_month_nps": 8.0, "feedback_count": 12,
        "team_size": 8, "event_participation": 5, "professional_network_connections": 25,
        "internal_community_interactions": 12, "gender": "M", "department_area": "IT",
        "contract_type": "Indefinido", "seniority_level": "Semi-Senior"
    })
}
