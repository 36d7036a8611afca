//! Onboarding program handlers

use axum::{extract::{State, Query}, http::StatusCode, Json};
use serde::Deserialize;

use crate::{AppState, AppResult, AppError};
use crate::models::{Employee, EnrollRequest, EnrollResponse, Enrollment};
use crate::middleware::auth::UserContext;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    _user: UserContext,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Enrollment>>> {
    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let enrollments = Enrollment::list(&state.pool, limit).await?;
    Ok(Json(enrollments))
}

/// Enroll an employee; enrolling twice is not an error
pub async fn enroll(
    State(state): State<AppState>,
    user: UserContext,
    Json(req): Json<EnrollRequest>,
) -> AppResult<(StatusCode, Json<EnrollResponse>)> {
    if !Employee::exists(&state.pool, req.employee_id).await? {
        return Err(AppError::NotFound("Employee not found".to_string()));
    }

    let response = Enrollment::enroll(&state.pool, req.employee_id, user.user_id).await?;
    let status = if response.created { StatusCode::CREATED } else { StatusCode::OK };

    if response.created {
        tracing::info!("Employee {} enrolled in onboarding by {}", req.employee_id, user.user_id);
    }

    Ok((status, Json(response)))
}
