use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use std::sync::Arc;

use crate::{
    extractors::ValidatedJson,
    middlewares::auth::CurrentUser,
    models::user::{CurrentUserResponse, SignInRequest, SignUpRequest},
    services::{identity::AuthError, AppState},
};

fn auth_error_response(e: AuthError) -> (StatusCode, String) {
    let status = match &e {
        AuthError::Validation(_) | AuthError::AlreadyRegistered => StatusCode::BAD_REQUEST,
        AuthError::InvalidCredentials | AuthError::SessionNotFound | AuthError::Token(_) => {
            StatusCode::UNAUTHORIZED
        }
        AuthError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

/// POST /api/v1/auth/register - Register a new user
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SignUpRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Registering new user: {}", req.email);

    match state.auth.sign_up(&req).await {
        Ok(response) => {
            tracing::info!("User registered successfully");
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(e) => {
            tracing::warn!("Failed to register user: {}", e);
            Err(auth_error_response(e))
        }
    }
}

/// POST /api/v1/auth/login - Login with email and password
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SignInRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Login attempt for user: {}", req.email);

    match state.auth.sign_in(&req).await {
        Ok(response) => Ok((StatusCode::OK, Json(response))),
        Err(e) => {
            tracing::warn!("Login failed for {}: {}", req.email, e);
            Err(auth_error_response(e))
        }
    }
}

/// GET /api/v1/auth/me - Get current user profile (protected)
pub async fn get_current_user(
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    Ok(Json(CurrentUserResponse { user: current.user }))
}

/// POST /api/v1/auth/logout - End the caller's session (protected)
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .auth
        .sign_out(&current)
        .await
        .map_err(auth_error_response)?;

    Ok(StatusCode::NO_CONTENT)
}
