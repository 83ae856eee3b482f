use std::sync::Arc;

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::HeaderName::from_static(
            middlewares::trace::TRACE_ID_HEADER,
        )])
        .allow_origin(tower_http::cors::Any);

    // Everything below requires a live bearer session
    let protected = Router::new()
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .route(
            "/learning-path",
            get(handlers::learning_path::get_learning_path),
        )
        .route("/resources", get(handlers::resources::list_resources))
        .nest("/assessments", assessment_routes())
        .nest("/chat", chat_routes())
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            middlewares::auth::auth_middleware,
        ));

    Router::new()
        // Public endpoints (no auth required)
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler)
                .layer(middleware::from_fn(handlers::metrics_auth_middleware)),
        )
        .nest("/api/v1/auth", auth_routes(app_state.clone()))
        .nest("/api/v1", protected)
        .with_state(app_state)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(middlewares::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
}

fn assessment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::assessments::start_assessment))
        .route(
            "/{id}",
            get(handlers::assessments::get_assessment)
                .delete(handlers::assessments::close_assessment),
        )
        .route("/{id}/select", post(handlers::assessments::select_answer))
        .route("/{id}/submit", post(handlers::assessments::submit))
        .route("/{id}/previous", post(handlers::assessments::go_previous))
}

fn chat_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::chat::create_chat))
        .route(
            "/{id}",
            get(handlers::chat::get_chat).delete(handlers::chat::close_chat),
        )
        .route("/{id}/messages", post(handlers::chat::send_message))
        .route("/{id}/stream", get(handlers::chat::chat_stream))
}

fn auth_routes(app_state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let protected_routes = Router::new()
        .route("/me", get(handlers::auth::get_current_user))
        .route("/logout", post(handlers::auth::logout))
        .route_layer(middleware::from_fn_with_state(
            app_state,
            middlewares::auth::auth_middleware,
        ));

    public_routes.merge(protected_routes)
}
