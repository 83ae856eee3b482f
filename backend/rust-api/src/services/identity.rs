//! Identity provider boundary.
//!
//! Everything that needs to know who is signed in receives an
//! `Arc<dyn IdentityProvider>` explicitly; there is no global session.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tokio::time::Instant;
use uuid::Uuid;
use validator::Validate;

use crate::models::user::{SignInRequest, SignUpRequest, User};

const EVENT_BUFFER: usize = 256;
const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid login credentials")]
    InvalidCredentials,
    #[error("User already registered")]
    AlreadyRegistered,
    #[error("{0}")]
    Validation(String),
    #[error("Session not found or already signed out")]
    SessionNotFound,
    #[error("Invalid token: {0}")]
    Token(String),
    #[error("Identity provider failure: {0}")]
    Provider(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn { user_id: Uuid, session_id: Uuid },
    SignedOut { user_id: Uuid, session_id: Uuid },
    Expired { user_id: Uuid, session_id: Uuid },
}

/// A signed-in session as issued by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub session_id: Uuid,
    pub user: User,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, req: &SignInRequest) -> Result<AuthSession, AuthError>;

    async fn sign_up(&self, req: &SignUpRequest) -> Result<AuthSession, AuthError>;

    async fn sign_out(&self, session_id: Uuid) -> Result<(), AuthError>;

    /// The user behind a live session. Expired sessions read as absent.
    async fn current_user(&self, session_id: Uuid) -> Option<User>;

    /// Drops every expired session and returns their ids.
    async fn evict_expired(&self) -> Vec<Uuid>;

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

struct StoredAccount {
    user: User,
    password_hash: String,
}

struct StoredSession {
    user: User,
    expires_at: Instant,
}

impl StoredSession {
    fn expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Process-local provider backed by hash maps. Accounts and sessions vanish
/// on restart.
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<String, StoredAccount>>,
    sessions: RwLock<HashMap<Uuid, StoredSession>>,
    events: broadcast::Sender<AuthEvent>,
    bcrypt_cost: u32,
    session_ttl: Duration,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::with_cost(DEFAULT_COST)
    }
}

impl InMemoryIdentityProvider {
    pub fn with_cost(bcrypt_cost: u32) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            accounts: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            events,
            bcrypt_cost,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    pub fn with_session_ttl(mut self, session_ttl: Duration) -> Self {
        self.session_ttl = session_ttl;
        self
    }

    async fn open_session(&self, user: User) -> AuthSession {
        let session_id = Uuid::new_v4();
        self.sessions.write().await.insert(
            session_id,
            StoredSession {
                user: user.clone(),
                expires_at: Instant::now() + self.session_ttl,
            },
        );
        let _ = self.events.send(AuthEvent::SignedIn {
            user_id: user.id,
            session_id,
        });
        AuthSession { session_id, user }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in(&self, req: &SignInRequest) -> Result<AuthSession, AuthError> {
        req.validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let email = normalize_email(&req.email);
        let user = {
            let accounts = self.accounts.read().await;
            let account = accounts
                .get(&email)
                .ok_or(AuthError::InvalidCredentials)?;
            let valid = verify(&req.password, &account.password_hash)
                .map_err(|e| AuthError::Provider(e.to_string()))?;
            if !valid {
                tracing::warn!(email = %email, "Failed sign-in attempt: invalid password");
                return Err(AuthError::InvalidCredentials);
            }
            account.user.clone()
        };

        Ok(self.open_session(user).await)
    }

    async fn sign_up(&self, req: &SignUpRequest) -> Result<AuthSession, AuthError> {
        req.validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let email = normalize_email(&req.email);
        let password_hash = hash(&req.password, self.bcrypt_cost)
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let user = {
            let mut accounts = self.accounts.write().await;
            if accounts.contains_key(&email) {
                return Err(AuthError::AlreadyRegistered);
            }

            let user = User {
                id: Uuid::new_v4(),
                email: email.clone(),
                role: req.role,
                full_name: req.full_name.trim().to_string(),
                created_at: Utc::now(),
            };
            accounts.insert(
                email,
                StoredAccount {
                    user: user.clone(),
                    password_hash,
                },
            );
            user
        };

        tracing::info!(user_id = %user.id, role = user.role.as_str(), "User registered");
        Ok(self.open_session(user).await)
    }

    async fn sign_out(&self, session_id: Uuid) -> Result<(), AuthError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(&session_id)
            .ok_or(AuthError::SessionNotFound)?;

        let _ = self.events.send(AuthEvent::SignedOut {
            user_id: session.user.id,
            session_id,
        });
        Ok(())
    }

    async fn current_user(&self, session_id: Uuid) -> Option<User> {
        let now = Instant::now();
        {
            let sessions = self.sessions.read().await;
            let session = sessions.get(&session_id)?;
            if !session.expired(now) {
                return Some(session.user.clone());
            }
        }

        let mut sessions = self.sessions.write().await;
        if sessions.get(&session_id).is_some_and(|s| s.expired(now)) {
            if let Some(session) = sessions.remove(&session_id) {
                let _ = self.events.send(AuthEvent::Expired {
                    user_id: session.user.id,
                    session_id,
                });
            }
        }
        None
    }

    async fn evict_expired(&self) -> Vec<Uuid> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let expired: Vec<Uuid> = sessions
            .iter()
            .filter(|(_, session)| session.expired(now))
            .map(|(id, _)| *id)
            .collect();

        for session_id in &expired {
            if let Some(session) = sessions.remove(session_id) {
                let _ = self.events.send(AuthEvent::Expired {
                    user_id: session.user.id,
                    session_id: *session_id,
                });
            }
        }
        if !expired.is_empty() {
            tracing::info!(evicted = expired.len(), live = sessions.len(), "Evicted expired sessions");
        }
        expired
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
