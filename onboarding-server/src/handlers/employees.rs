//! Employee handlers

use axum::{extract::{State, Path, Query}, http::StatusCode, Json};
use uuid::Uuid;
use serde::Deserialize;

use crate::{AppState, AppResult, AppError};
use crate::models::{CreateEmployee, Employee, EmployeeDetail, EmployeeList, MAX_LIST_LIMIT};
use crate::middleware::auth::UserContext;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// List employees with their integration status
pub async fn list(
    State(state): State<AppState>,
    _user: UserContext,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<EmployeeList>> {
    let limit = query.limit.unwrap_or(MAX_LIST_LIMIT);
    let employees = Employee::list_with_integration(&state.pool, limit).await?;

    Ok(Json(EmployeeList {
        total: employees.len(),
        employees,
    }))
}

/// Employee with recruitment, integration and training sections
pub async fn get(
    State(state): State<AppState>,
    _user: UserContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EmployeeDetail>> {
    let detail = Employee::detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    Ok(Json(detail))
}

/// Create employee
pub async fn create(
    State(state): State<AppState>,
    user: UserContext,
    Json(req): Json<CreateEmployee>,
) -> AppResult<(StatusCode, Json<EmployeeDetail>)> {
    req.validate_all()?;

    if Employee::email_taken(&state.pool, &req.email).await? {
        return Err(AppError::AlreadyExists("Employee email already registered".to_string()));
    }

    let detail = Employee::create(&state.pool, &req).await?;
    tracing::info!("Employee {} created by {}", detail.employee.id, user.user_id);

    Ok((StatusCode::CREATED, Json(detail)))
}
