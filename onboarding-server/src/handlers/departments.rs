//! Department handlers

use axum::{extract::State, Json};

use crate::{AppState, AppResult};
use crate::models::{Department, DepartmentList};
use crate::middleware::auth::UserContext;

pub async fn list(
    State(state): State<AppState>,
    _user: UserContext,
) -> AppResult<Json<DepartmentList>> {
    let departments = Department::list_names(&state.pool).await?;
    Ok(Json(DepartmentList { departments }))
}
