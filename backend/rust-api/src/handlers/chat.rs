use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Extension, Json,
};
use futures::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::{
    extractors::AppJson,
    metrics::SSE_CONNECTIONS_ACTIVE,
    middlewares::auth::CurrentUser,
    models::chat::{ChatEvent, CreateChatResponse, SendMessageRequest, SendMessageResponse},
    services::{chat_service::ChatError, content_service::quick_actions, AppState},
};

fn error_response(e: ChatError) -> (StatusCode, String) {
    let status = match e {
        ChatError::NotFound => StatusCode::NOT_FOUND,
        ChatError::Composing => StatusCode::CONFLICT,
    };
    (status, e.to_string())
}

/// POST /api/v1/chat - Open a chat session seeded with the greeting
pub async fn create_chat(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state.chats.open(current.session_id).await;

    Ok((
        StatusCode::CREATED,
        Json(CreateChatResponse {
            session,
            quick_actions: quick_actions(),
        }),
    ))
}

pub async fn get_chat(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let view = state
        .chats
        .transcript(current.session_id, session_id)
        .await
        .map_err(error_response)?;

    Ok(Json(view))
}

/// POST /api/v1/chat/{id}/messages - Send a message; the reply arrives later
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(session_id): Path<Uuid>,
    AppJson(req): AppJson<SendMessageRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let message = state
        .chats
        .send_message(current.session_id, session_id, &req.content)
        .await
        .map_err(|e| {
            tracing::warn!("Rejected chat message for session {}: {}", session_id, e);
            error_response(e)
        })?;

    let status = if message.is_some() {
        StatusCode::ACCEPTED
    } else {
        StatusCode::OK
    };
    let composing = message.is_some();

    Ok((status, Json(SendMessageResponse { message, composing })))
}

pub async fn close_chat(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .chats
        .close(current.session_id, session_id)
        .await
        .map_err(error_response)?;

    Ok(StatusCode::NO_CONTENT)
}

/// SSE endpoint for chat transcript updates
/// GET /api/v1/chat/{id}/stream
pub async fn chat_stream(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (view, receiver) = state
        .chats
        .subscribe(current.session_id, session_id)
        .await
        .map_err(error_response)?;

    tracing::info!("Client connected to chat stream: session={}", session_id);

    let mut backlog: Vec<ChatEvent> = view.messages.into_iter().map(ChatEvent::ChatMessage).collect();
    backlog.push(ChatEvent::Composing {
        composing: view.composing,
    });

    let stream = stream::iter(backlog)
        .map(|event| Ok(to_sse_event(&event)))
        .chain(live_events(session_id, receiver));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn to_sse_event(event: &ChatEvent) -> Event {
    Event::default()
        .event(event.event_name())
        .data(event.to_sse_data())
}

/// Keeps the connection gauge in step with the stream's lifetime.
struct ConnectionGuard {
    session_id: Uuid,
}

impl ConnectionGuard {
    fn new(session_id: Uuid) -> Self {
        SSE_CONNECTIONS_ACTIVE.inc();
        Self { session_id }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        SSE_CONNECTIONS_ACTIVE.dec();
        tracing::info!("Chat stream ended: session={}", self.session_id);
    }
}

/// Live events until the session is closed and its sender dropped.
fn live_events(
    session_id: Uuid,
    receiver: broadcast::Receiver<ChatEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let guard = ConnectionGuard::new(session_id);

    stream::unfold((receiver, guard), |(mut receiver, guard)| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => return Some((Ok(to_sse_event(&event)), (receiver, guard))),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "Chat stream lagged: session={}, skipped={}",
                        guard.session_id,
                        skipped
                    );
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}
