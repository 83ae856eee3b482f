use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::config::Config;
use crate::middlewares::auth::JwtService;

use self::assessment_service::AssessmentService;
use self::auth_service::AuthService;
use self::chat_service::ChatService;
use self::content_service::ContentService;
use self::identity::{AuthEvent, IdentityProvider};
use self::responder::ScriptedResponder;

pub mod assessment;
pub mod assessment_service;
pub mod auth_service;
pub mod catalog;
pub mod chat_service;
pub mod content_service;
pub mod dashboard_service;
pub mod demo_seed;
pub mod identity;
pub mod responder;

pub struct AppState {
    pub config: Config,
    pub content: ContentService,
    pub assessments: AssessmentService,
    pub chats: ChatService,
    pub auth: AuthService,
    background: Mutex<Vec<JoinHandle<()>>>,
}

impl AppState {
    pub fn new(config: Config, identity: Arc<dyn IdentityProvider>) -> Self {
        let content = ContentService::seeded();
        let assessments = AssessmentService::new(content.questions());
        let chats = ChatService::new(ScriptedResponder::default(), config.chat);
        let auth = AuthService::new(
            identity,
            JwtService::new(&config.jwt_secret),
            config.access_token_ttl_seconds,
        );

        Self {
            config,
            content,
            assessments,
            chats,
            auth,
            background: Mutex::new(Vec::new()),
        }
    }

    /// Seeds demo accounts (when enabled), then starts the auth event
    /// listener and the periodic session sweep. Both stop in `dispose`.
    pub async fn initialize(self: &Arc<Self>) -> anyhow::Result<()> {
        // Subscribe first so no sign-out is missed between seeding and spawn.
        let events = self.auth.identity().subscribe();

        if self.config.seed_demo_accounts {
            let created = demo_seed::bootstrap(self.auth.identity().as_ref()).await?;
            tracing::info!("Demo account seeding complete ({} created)", created);
        }

        let listener = tokio::spawn(listen_for_auth_events(Arc::downgrade(self), events));
        let sweeper = tokio::spawn(sweep_periodically(
            Arc::downgrade(self),
            self.config.session_sweep_interval(),
        ));
        self.background.lock().await.extend([listener, sweeper]);

        Ok(())
    }

    /// Evicts expired identity sessions, then closes every assessment and
    /// chat whose owning identity session is gone. Returns how many were closed.
    pub async fn sweep_sessions(&self) -> usize {
        let identity = self.auth.identity();
        let expired = identity.evict_expired().await;

        let mut owners = self.assessments.owners().await;
        owners.extend(self.chats.owners().await);
        owners.sort_unstable();
        owners.dedup();

        let mut closed = 0;
        for owner in owners {
            if identity.current_user(owner).await.is_none() {
                closed += self.close_sessions_of(owner).await;
            }
        }

        if !expired.is_empty() || closed > 0 {
            tracing::info!(expired = expired.len(), closed, "Session sweep finished");
        }
        closed
    }

    async fn close_sessions_of(&self, owner: Uuid) -> usize {
        let assessments = self.assessments.close_all_for(owner).await;
        let chats = self.chats.close_all_for(owner).await;
        assessments + chats
    }

    /// Stops background tasks, cancels pending chat replies and drops every
    /// open session.
    pub async fn dispose(&self) {
        for task in self.background.lock().await.drain(..) {
            task.abort();
        }
        self.chats.shutdown().await;
        self.assessments.clear().await;
        tracing::info!("Application state disposed");
    }
}

async fn listen_for_auth_events(state: Weak<AppState>, mut events: broadcast::Receiver<AuthEvent>) {
    loop {
        match events.recv().await {
            Ok(
                AuthEvent::SignedOut {
                    user_id,
                    session_id,
                }
                | AuthEvent::Expired {
                    user_id,
                    session_id,
                },
            ) => {
                let Some(state) = state.upgrade() else { break };
                let closed = state.close_sessions_of(session_id).await;
                tracing::info!(
                    user_id = %user_id,
                    session_id = %session_id,
                    closed,
                    "Closed sessions of ended identity session"
                );
            }
            Ok(AuthEvent::SignedIn { user_id, .. }) => {
                tracing::debug!(user_id = %user_id, "Auth state changed: signed in");
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Auth event listener lagged, {} events skipped", skipped);
                let Some(state) = state.upgrade() else { break };
                state.sweep_sessions().await;
            }
            Err(RecvError::Closed) => break,
        }
    }
}

async fn sweep_periodically(state: Weak<AppState>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let Some(state) = state.upgrade() else { break };
        state.sweep_sessions().await;
    }
}
