use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::services::AppState;

/// GET /api/v1/learning-path
pub async fn get_learning_path(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.content.learning_path())
}
