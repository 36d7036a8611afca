//! Survey handlers

use axum::{extract::{State, Query}, http::StatusCode, Json};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, AppResult, AppError};
use crate::models::{CreateSurvey, Employee, Survey};
use crate::middleware::auth::UserContext;

#[derive(Debug, Deserialize)]
pub struct SurveyQuery {
    pub employee_id: Option<Uuid>,
    pub limit: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    _user: UserContext,
    Query(query): Query<SurveyQuery>,
) -> AppResult<Json<Vec<Survey>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let surveys = Survey::list(&state.pool, query.employee_id, limit).await?;
    Ok(Json(surveys))
}

pub async fn create(
    State(state): State<AppState>,
    user: UserContext,
    Json(req): Json<CreateSurvey>,
) -> AppResult<(StatusCode, Json<Survey>)> {
    req.validate()?;

    if let Some(employee_id) = req.employee_id {
        if !Employee::exists(&state.pool, employee_id).await? {
            return Err(AppError::NotFound("Employee not found".to_string()));
        }
    }

    let survey = Survey::create(&state.pool, &req, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(survey)))
}
