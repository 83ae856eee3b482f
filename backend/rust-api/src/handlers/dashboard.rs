use axum::{response::IntoResponse, Extension, Json};

use crate::{middlewares::auth::CurrentUser, services::dashboard_service};

/// GET /api/v1/dashboard - Student or teacher dashboard, chosen by the caller's role
pub async fn get_dashboard(Extension(current): Extension<CurrentUser>) -> impl IntoResponse {
    tracing::debug!(
        "Serving {} dashboard to {}",
        current.user.role.as_str(),
        current.user.id
    );
    Json(dashboard_service::dashboard(current.user.role))
}
