#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use study_buddy_api::{
    config::{ChatSettings, Config},
    create_router,
    services::{identity::InMemoryIdentityProvider, AppState},
};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with(false).await
}

pub async fn create_test_app_with(seed_demo_accounts: bool) -> TestApp {
    create_test_app_from(test_config(seed_demo_accounts)).await
}

pub fn test_config(seed_demo_accounts: bool) -> Config {
    Config {
        jwt_secret: "integration-test-secret".to_string(),
        chat: ChatSettings {
            reply_delay_min_ms: 10,
            reply_delay_max_ms: 30,
        },
        seed_demo_accounts,
        ..Config::default()
    }
}

pub async fn create_test_app_from(config: Config) -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    // Low bcrypt cost keeps registration fast in tests
    let identity = Arc::new(
        InMemoryIdentityProvider::with_cost(4).with_session_ttl(config.session_ttl()),
    );
    let state = Arc::new(AppState::new(config, identity));
    state
        .initialize()
        .await
        .expect("Failed to initialize test app state");

    TestApp {
        router: create_router(state.clone()),
        state,
    }
}

/// Sends a request and returns the status plus the body parsed as JSON
/// (`Value::Null` for empty bodies, a JSON string for plain-text bodies).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

/// Registers a fresh account and returns its access token.
pub async fn register(app: &Router, email: &str, role: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "secret123",
            "full_name": "Test User",
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

    body["access_token"]
        .as_str()
        .expect("access_token missing")
        .to_string()
}

/// Polls `check` until it returns true or about two seconds pass.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
