//! Integration statistics handler

use axum::{extract::State, Json};

use crate::{AppState, AppResult};
use crate::models::IntegrationStatistics;
use crate::middleware::auth::UserContext;

pub async fn statistics(
    State(state): State<AppState>,
    _user: UserContext,
) -> AppResult<Json<IntegrationStatistics>> {
    let stats = IntegrationStatistics::compute(&state.pool).await?;
    Ok(Json(stats))
}
