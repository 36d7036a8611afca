//! Prediction handlers

use axum::{extract::{State, Query}, Json};
use validator::Validate;

use crate::{AppState, AppResult, AppError};
use crate::models::{Employee, PredictRequest, PredictResponse, PredictionQuery, StoredPrediction};
use crate::middleware::auth::UserContext;

/// Validate, score and optionally store one onboarding record
pub async fn predict(
    State(state): State<AppState>,
    user: UserContext,
    Json(req): Json<PredictRequest>,
) -> AppResult<Json<PredictResponse>> {
    req.record.validate()?;

    // Inference is CPU-bound
    let predictor = state.predictor.clone();
    let record = req.record.clone();
    let prediction = tokio::task::spawn_blocking(move || predictor.predict(&record))
        .await
        .map_err(|e| AppError::InternalError(format!("Prediction task failed: {}", e)))??;

    if prediction.metadata.degraded_encoding {
        tracing::warn!(
            "Prediction served with fallback encodings: {:?}",
            prediction.metadata.fallbacks
        );
    }

    let prediction_id = match req.employee_id {
        Some(employee_id) => {
            if !Employee::exists(&state.pool, employee_id).await? {
                return Err(AppError::NotFound("Employee not found".to_string()));
            }
            let stored =
                StoredPrediction::create(&state.pool, employee_id, &req.record, &prediction, user.user_id).await?;
            Some(stored.id)
        }
        None => None,
    };

    Ok(Json(PredictResponse {
        prediction_id,
        employee_id: req.employee_id,
        prediction,
    }))
}

pub async fn list(
    State(state): State<AppState>,
    _user: UserContext,
    Query(query): Query<PredictionQuery>,
) -> AppResult<Json<Vec<StoredPrediction>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let predictions = StoredPrediction::list(&state.pool, query.employee_id, limit).await?;
    Ok(Json(predictions))
}
