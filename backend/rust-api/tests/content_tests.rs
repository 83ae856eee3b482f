use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use base64::{engine::general_purpose, Engine as _};
use serial_test::serial;
use tower::ServiceExt;

mod common;

use common::{create_test_app, register, send};

#[tokio::test]
async fn test_health_reports_session_counts() {
    let app = create_test_app().await;

    let (status, body) = send(&app.router, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["sessions"]["assessments"], 0);
    assert_eq!(body["sessions"]["chats"], 0);
}

#[tokio::test]
async fn test_every_response_has_trace_id() {
    let app = create_test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-trace-id"));

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/dashboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("x-trace-id"));
}

#[tokio::test]
#[serial]
async fn test_metrics_requires_basic_auth() {
    std::env::remove_var("METRICS_AUTH");
    let app = create_test_app().await;

    let (status, _) = send(&app.router, "GET", "/metrics", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let credentials = general_purpose::STANDARD.encode("admin:changeme");
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .header(header::AUTHORIZATION, format!("Basic {}", credentials))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_resource_catalog_filters() {
    let app = create_test_app().await;
    let token = register(&app.router, "reader@example.com", "student").await;

    let (status, body) = send(&app.router, "GET", "/api/v1/resources", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resources"].as_array().unwrap().len(), 4);
    assert_eq!(body["total_available"], 4);
    assert_eq!(body["subjects"][0], "All");
    assert_eq!(body["types"][1], "video");

    let (_, body) = send(
        &app.router,
        "GET",
        "/api/v1/resources?search=QUADRATIC",
        Some(&token),
        None,
    )
    .await;
    let resources = body["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0]["title"], "Understanding Quadratic Equations");

    let (_, body) = send(
        &app.router,
        "GET",
        "/api/v1/resources?subject=Mathematics&type=video",
        Some(&token),
        None,
    )
    .await;
    let resources = body["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0]["type"], "video");

    let (_, body) = send(
        &app.router,
        "GET",
        "/api/v1/resources?subject=Science&type=article",
        Some(&token),
        None,
    )
    .await;
    assert!(body["resources"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_learning_path_progress() {
    let app = create_test_app().await;
    let token = register(&app.router, "path@example.com", "student").await;

    let (status, body) = send(&app.router, "GET", "/api/v1/learning-path", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);
    assert_eq!(body["completed_count"], 2);
    assert_eq!(body["progress_percent"], 40);
    assert_eq!(body["next_module"]["id"], "3");
    assert_eq!(body["modules"][4]["locked"], true);
}

#[tokio::test]
async fn test_dashboard_follows_role() {
    let app = create_test_app().await;
    let student = register(&app.router, "kid@example.com", "student").await;
    let teacher = register(&app.router, "mwalimu@example.com", "teacher").await;

    let (status, body) = send(&app.router, "GET", "/api/v1/dashboard", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "student");
    assert_eq!(body["competencies"][0]["name"], "Problem Solving");
    assert_eq!(body["competencies"][0]["progress"], 85);
    assert_eq!(body["weekly_progress"].as_array().unwrap().len(), 7);

    let (status, body) = send(&app.router, "GET", "/api/v1/dashboard", Some(&teacher), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "teacher");
    assert_eq!(body["stats"][0]["value"], "28");
    assert_eq!(body["needs_attention"].as_array().unwrap().len(), 3);
}
