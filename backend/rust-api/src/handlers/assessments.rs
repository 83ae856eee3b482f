use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    extractors::AppJson,
    middlewares::auth::CurrentUser,
    models::assessment::SelectAnswerRequest,
    services::{
        assessment::AssessmentError, assessment_service::AssessmentServiceError, AppState,
    },
};

fn error_response(e: AssessmentServiceError) -> (StatusCode, String) {
    let status = match &e {
        AssessmentServiceError::NotFound => StatusCode::NOT_FOUND,
        AssessmentServiceError::Assessment(inner) => match inner {
            AssessmentError::OptionOutOfRange { .. } => StatusCode::BAD_REQUEST,
            AssessmentError::EmptyQuestionSet => StatusCode::INTERNAL_SERVER_ERROR,
            AssessmentError::NoAnswerSelected
            | AssessmentError::AlreadyRevealed
            | AssessmentError::AtFirstQuestion
            | AssessmentError::AlreadyComplete
            | AssessmentError::NotComplete => StatusCode::CONFLICT,
        },
    };
    (status, e.to_string())
}

/// POST /api/v1/assessments - Start a new competency assessment
pub async fn start_assessment(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Starting assessment for user_id={}", current.user.id);

    match state.assessments.start(current.session_id).await {
        Ok(view) => Ok((StatusCode::CREATED, Json(view))),
        Err(e) => {
            tracing::error!("Failed to start assessment: {}", e);
            Err(error_response(e))
        }
    }
}

pub async fn get_assessment(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let view = state
        .assessments
        .view(current.session_id, session_id)
        .await
        .map_err(error_response)?;

    Ok(Json(view))
}

pub async fn select_answer(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(session_id): Path<Uuid>,
    AppJson(req): AppJson<SelectAnswerRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let view = state
        .assessments
        .select_answer(current.session_id, session_id, req.index)
        .await
        .map_err(|e| {
            tracing::warn!("Rejected answer selection for session {}: {}", session_id, e);
            error_response(e)
        })?;

    Ok(Json(view))
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let view = state
        .assessments
        .submit(current.session_id, session_id)
        .await
        .map_err(|e| {
            tracing::warn!("Rejected submit for session {}: {}", session_id, e);
            error_response(e)
        })?;

    Ok(Json(view))
}

pub async fn go_previous(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let view = state
        .assessments
        .go_previous(current.session_id, session_id)
        .await
        .map_err(error_response)?;

    Ok(Json(view))
}

pub async fn close_assessment(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .assessments
        .close(current.session_id, session_id)
        .await
        .map_err(error_response)?;

    Ok(StatusCode::NO_CONTENT)
}
