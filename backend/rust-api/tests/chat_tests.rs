use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::json;
use std::time::Duration;
use study_buddy_api::{
    config::ChatSettings,
    models::chat::{ChatEvent, Sender},
    services::chat_service::ChatError,
};
use tokio::sync::broadcast::error::TryRecvError;
use tower::ServiceExt;
use uuid::Uuid;

mod common;

use common::{create_test_app, create_test_app_from, eventually, register, send, test_config};

const GREETING_PREFIX: &str = "Hello! I'm your AI Study Assistant.";

async fn open_chat(app: &axum::Router, token: &str) -> String {
    let (status, body) = send(app, "POST", "/api/v1/chat", Some(token), None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_open_chat_has_greeting_and_quick_actions() {
    let app = create_test_app().await;
    let token = register(&app.router, "chat@example.com", "student").await;

    let (status, body) = send(&app.router, "POST", "/api/v1/chat", Some(&token), None).await;

    assert_eq!(status, StatusCode::CREATED);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["sender"], "ai");
    assert!(messages[0]["content"]
        .as_str()
        .unwrap()
        .starts_with(GREETING_PREFIX));
    assert_eq!(body["composing"], false);
    assert_eq!(body["quick_actions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_message_gets_scripted_reply() {
    let app = create_test_app().await;
    let token = register(&app.router, "algebra@example.com", "student").await;
    let id = open_chat(&app.router, &token).await;

    let (status, body) = send(
        &app.router,
        "POST",
        &format!("/api/v1/chat/{}/messages", id),
        Some(&token),
        Some(json!({ "content": "Can you help with algebra?" })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["message"]["sender"], "user");
    assert_eq!(body["composing"], true);

    // A second send while composing is refused
    let (status, _) = send(
        &app.router,
        "POST",
        &format!("/api/v1/chat/{}/messages", id),
        Some(&token),
        Some(json!({ "content": "hello?" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let router = app.router.clone();
    let uri = format!("/api/v1/chat/{}", id);
    let replied = eventually(|| {
        let router = router.clone();
        let uri = uri.clone();
        let token = token.clone();
        async move {
            let (_, body) = send(&router, "GET", &uri, Some(&token), None).await;
            body["messages"].as_array().map(Vec::len) == Some(3)
        }
    })
    .await;
    assert!(replied);

    let (_, body) = send(&app.router, "GET", &uri, Some(&token), None).await;
    assert_eq!(body["composing"], false);
    let reply = &body["messages"][2];
    assert_eq!(reply["sender"], "ai");
    assert!(reply["content"]
        .as_str()
        .unwrap()
        .starts_with("I'd be happy to help with mathematics!"));
}

#[tokio::test]
async fn test_blank_message_is_ignored() {
    let app = create_test_app().await;
    let token = register(&app.router, "blank@example.com", "student").await;
    let id = open_chat(&app.router, &token).await;

    let (status, body) = send(
        &app.router,
        "POST",
        &format!("/api/v1/chat/{}/messages", id),
        Some(&token),
        Some(json!({ "content": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], serde_json::Value::Null);
    assert_eq!(body["composing"], false);

    let (_, body) = send(&app.router, "GET", &format!("/api/v1/chat/{}", id), Some(&token), None).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_close_chat_and_privacy() {
    let app = create_test_app().await;
    let owner = register(&app.router, "chatowner@example.com", "student").await;
    let other = register(&app.router, "snoop@example.com", "teacher").await;
    let id = open_chat(&app.router, &owner).await;
    let uri = format!("/api/v1/chat/{}", id);

    let (status, _) = send(&app.router, "GET", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        &app.router,
        "POST",
        &format!("{}/messages", uri),
        Some(&owner),
        Some(json!({ "content": "science please" })),
    )
    .await;

    let (status, _) = send(&app.router, "DELETE", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app.router, "GET", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.state.chats.active_sessions().await, 0);
}

#[tokio::test]
async fn test_stream_replays_transcript() {
    let app = create_test_app().await;
    let token = register(&app.router, "stream@example.com", "student").await;
    let id = open_chat(&app.router, &token).await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/chat/{}/stream", id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );

    let mut body = response.into_body();
    let mut received = String::new();
    while !received.contains("event: composing") {
        let frame = tokio::time::timeout(Duration::from_secs(2), body.frame())
            .await
            .expect("stream stalled")
            .expect("stream ended")
            .unwrap();
        if let Ok(data) = frame.into_data() {
            received.push_str(&String::from_utf8_lossy(&data));
        }
    }

    assert!(received.contains("event: chat-message"));
    assert!(received.contains(GREETING_PREFIX));
}

#[tokio::test]
async fn test_logout_cancels_pending_reply() {
    let mut config = test_config(false);
    config.chat = ChatSettings {
        reply_delay_min_ms: 400,
        reply_delay_max_ms: 500,
    };
    let app = create_test_app_from(config).await;
    let token = register(&app.router, "walkaway@example.com", "student").await;
    let id = open_chat(&app.router, &token).await;
    let chat_id = Uuid::parse_str(&id).unwrap();

    let current = app.state.auth.authenticate(&token).await.unwrap();
    let (_, mut events) = app
        .state
        .chats
        .subscribe(current.session_id, chat_id)
        .await
        .unwrap();

    let (status, body) = send(
        &app.router,
        "POST",
        &format!("/api/v1/chat/{}/messages", id),
        Some(&token),
        Some(json!({ "content": "Explain photosynthesis science" })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["composing"], true);

    let (status, _) = send(&app.router, "POST", "/api/v1/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let state = app.state.clone();
    assert!(
        eventually(|| {
            let state = state.clone();
            async move { state.chats.active_sessions().await == 0 }
        })
        .await
    );
    tokio::time::sleep(Duration::from_millis(700)).await;

    let mut ai_replies = 0;
    loop {
        match events.try_recv() {
            Ok(ChatEvent::ChatMessage(m)) if m.sender == Sender::Ai => ai_replies += 1,
            Ok(_) => {}
            Err(TryRecvError::Closed) => break,
            Err(other) => panic!("unexpected receiver state: {:?}", other),
        }
    }
    assert_eq!(ai_replies, 0);
    assert_eq!(
        app.state
            .chats
            .transcript(current.session_id, chat_id)
            .await
            .unwrap_err(),
        ChatError::NotFound
    );
}

#[tokio::test]
async fn test_logout_leaves_other_device_chats_open() {
    let app = create_test_app().await;
    let laptop = register(&app.router, "twodevices@example.com", "student").await;
    let (status, body) = send(
        &app.router,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "twodevices@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let phone = body["access_token"].as_str().unwrap().to_string();

    let laptop_chat = open_chat(&app.router, &laptop).await;
    let phone_chat = open_chat(&app.router, &phone).await;

    // Chats belong to the signed-in session, not to the account.
    let (status, _) = send(
        &app.router,
        "GET",
        &format!("/api/v1/chat/{}", laptop_chat),
        Some(&phone),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app.router, "POST", "/api/v1/auth/logout", Some(&laptop), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let state = app.state.clone();
    assert!(
        eventually(|| {
            let state = state.clone();
            async move { state.chats.active_sessions().await == 1 }
        })
        .await
    );
    let (status, _) = send(
        &app.router,
        "GET",
        &format!("/api/v1/chat/{}", phone_chat),
        Some(&phone),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
