//! Model status handler

use axum::{extract::State, Json};
use onboarding_core::PredictorStatus;

use crate::AppState;
use crate::middleware::auth::UserContext;

pub async fn status(
    State(state): State<AppState>,
    _user: UserContext,
) -> Json<PredictorStatus> {
    Json(state.predictor.status())
}
