use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::content_service::CHAT_GREETING;
use super::responder::ScriptedResponder;
use crate::config::ChatSettings;
use crate::metrics::{CHAT_MESSAGES_TOTAL, CHAT_REPLIES_CANCELLED_TOTAL, CHAT_SESSIONS_ACTIVE};
use crate::models::chat::{ChatEvent, ChatMessage, ChatSessionView, Sender};

const EVENT_BUFFER: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("Chat session not found")]
    NotFound,
    #[error("Assistant is still composing a reply")]
    Composing,
}

struct ChatSession {
    transcript: Vec<ChatMessage>,
    pending_reply: Option<JoinHandle<()>>,
    events: broadcast::Sender<ChatEvent>,
}

impl ChatSession {
    fn composing(&self) -> bool {
        self.pending_reply.is_some()
    }

    fn append(&mut self, message: ChatMessage) {
        CHAT_MESSAGES_TOTAL
            .with_label_values(&[sender_label(message.sender)])
            .inc();
        self.transcript.push(message.clone());
        let _ = self.events.send(ChatEvent::ChatMessage(message));
    }

    fn set_composing(&self, composing: bool) {
        let _ = self.events.send(ChatEvent::Composing { composing });
    }

    fn cancel_pending(&mut self) -> bool {
        match self.pending_reply.take() {
            Some(handle) => {
                handle.abort();
                CHAT_REPLIES_CANCELLED_TOTAL.inc();
                true
            }
            None => false,
        }
    }

    fn view(&self, session_id: Uuid) -> ChatSessionView {
        ChatSessionView {
            session_id,
            messages: self.transcript.clone(),
            composing: self.composing(),
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Map entry. The owner sits outside the session mutex so ownership checks
/// never wait on a busy session.
#[derive(Clone)]
struct OwnedSession {
    owner: Uuid,
    session: Arc<Mutex<ChatSession>>,
}

/// Scripted chat sessions. Each user message schedules exactly one delayed
/// assistant reply; while it is pending the session rejects further sends.
///
/// `owner` is the identity session that opened the chat, not the user.
pub struct ChatService {
    responder: Arc<ScriptedResponder>,
    settings: ChatSettings,
    sessions: RwLock<HashMap<Uuid, OwnedSession>>,
}

impl ChatService {
    pub fn new(responder: ScriptedResponder, settings: ChatSettings) -> Self {
        Self {
            responder: Arc::new(responder),
            settings,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn open(&self, owner: Uuid) -> ChatSessionView {
        let session_id = Uuid::new_v4();
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let mut session = ChatSession {
            transcript: Vec::new(),
            pending_reply: None,
            events,
        };
        session.append(ChatMessage::new(Sender::Ai, CHAT_GREETING));
        let view = session.view(session_id);

        self.sessions.write().await.insert(
            session_id,
            OwnedSession {
                owner,
                session: Arc::new(Mutex::new(session)),
            },
        );
        CHAT_SESSIONS_ACTIVE.inc();

        tracing::info!(session_id = %session_id, owner = %owner, "Chat session opened");
        view
    }

    pub async fn transcript(&self, owner: Uuid, session_id: Uuid) -> Result<ChatSessionView, ChatError> {
        let session = self.session(owner, session_id).await?;
        let session = session.lock().await;
        Ok(session.view(session_id))
    }

    /// Appends the user's message and schedules the reply. Whitespace-only
    /// input is ignored and yields `Ok(None)`.
    pub async fn send_message(
        &self,
        owner: Uuid,
        session_id: Uuid,
        text: &str,
    ) -> Result<Option<ChatMessage>, ChatError> {
        let session_arc = self.session(owner, session_id).await?;
        if text.trim().is_empty() {
            return Ok(None);
        }

        let mut session = session_arc.lock().await;
        if session.composing() {
            return Err(ChatError::Composing);
        }

        let message = ChatMessage::new(Sender::User, text);
        session.append(message.clone());

        let topic = self.responder.topic(text);
        let reply = self.responder.classify(text);
        let delay = self.reply_delay();
        let weak = Arc::downgrade(&session_arc);

        // The lock is held until `pending_reply` is set, so the reply task
        // can never observe a session without its own handle.
        session.pending_reply = Some(tokio::spawn(deliver_reply(weak, reply, delay)));
        session.set_composing(true);

        tracing::debug!(
            session_id = %session_id,
            topic = ?topic,
            delay_ms = delay.as_millis() as u64,
            "Scheduled assistant reply"
        );

        Ok(Some(message))
    }

    /// Snapshot of the transcript plus a receiver for everything after it.
    /// Both are taken under the session lock, so no event falls in between.
    pub async fn subscribe(
        &self,
        owner: Uuid,
        session_id: Uuid,
    ) -> Result<(ChatSessionView, broadcast::Receiver<ChatEvent>), ChatError> {
        let session = self.session(owner, session_id).await?;
        let session = session.lock().await;
        Ok((session.view(session_id), session.events.subscribe()))
    }

    /// Removes the session and cancels any reply still pending for it.
    pub async fn close(&self, owner: Uuid, session_id: Uuid) -> Result<(), ChatError> {
        let removed = {
            let mut sessions = self.sessions.write().await;
            let owned = sessions
                .get(&session_id)
                .is_some_and(|entry| entry.owner == owner);
            if owned {
                sessions.remove(&session_id)
            } else {
                None
            }
        };
        let entry = removed.ok_or(ChatError::NotFound)?;

        let cancelled = entry.session.lock().await.cancel_pending();
        CHAT_SESSIONS_ACTIVE.dec();
        tracing::info!(session_id = %session_id, cancelled, "Chat session closed");
        Ok(())
    }

    /// Closes every chat opened by `owner`. Returns how many were closed.
    pub async fn close_all_for(&self, owner: Uuid) -> usize {
        let removed: Vec<OwnedSession> = {
            let mut sessions = self.sessions.write().await;
            let ids: Vec<Uuid> = sessions
                .iter()
                .filter(|(_, entry)| entry.owner == owner)
                .map(|(id, _)| *id)
                .collect();
            ids.iter().filter_map(|id| sessions.remove(id)).collect()
        };

        for entry in &removed {
            entry.session.lock().await.cancel_pending();
            CHAT_SESSIONS_ACTIVE.dec();
        }
        if !removed.is_empty() {
            tracing::info!(owner = %owner, closed = removed.len(), "Chat sessions closed for owner");
        }
        removed.len()
    }

    /// Cancels every pending reply and drops all sessions.
    pub async fn shutdown(&self) {
        let drained: Vec<OwnedSession> = {
            let mut sessions = self.sessions.write().await;
            sessions.drain().map(|(_, entry)| entry).collect()
        };
        for entry in &drained {
            entry.session.lock().await.cancel_pending();
        }
        CHAT_SESSIONS_ACTIVE.sub(drained.len() as i64);
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Distinct owners with at least one open chat.
    pub async fn owners(&self) -> Vec<Uuid> {
        let mut owners: Vec<Uuid> = self
            .sessions
            .read()
            .await
            .values()
            .map(|entry| entry.owner)
            .collect();
        owners.sort_unstable();
        owners.dedup();
        owners
    }

    fn reply_delay(&self) -> Duration {
        let ms = rand::rng()
            .random_range(self.settings.reply_delay_min_ms..self.settings.reply_delay_max_ms);
        Duration::from_millis(ms)
    }

    async fn session(&self, owner: Uuid, session_id: Uuid) -> Result<Arc<Mutex<ChatSession>>, ChatError> {
        match self.sessions.read().await.get(&session_id) {
            // Chats opened by someone else are reported as missing.
            Some(entry) if entry.owner == owner => Ok(Arc::clone(&entry.session)),
            _ => Err(ChatError::NotFound),
        }
    }
}

async fn deliver_reply(session: Weak<Mutex<ChatSession>>, reply: &'static str, delay: Duration) {
    tokio::time::sleep(delay).await;

    let Some(session) = session.upgrade() else {
        return;
    };
    let mut session = session.lock().await;
    // Dropping our own handle detaches; it does not abort this task.
    session.pending_reply = None;
    session.append(ChatMessage::new(Sender::Ai, reply));
    session.set_composing(false);
}

fn sender_label(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "user",
        Sender::Ai => "ai",
    }
}
