use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use super::identity::{AuthError, AuthSession, IdentityProvider};
use crate::metrics::record_auth_event;
use crate::middlewares::auth::{CurrentUser, JwtClaims, JwtService};
use crate::models::user::{AuthResponse, SignInRequest, SignUpRequest};

/// Wraps the identity provider with bearer-token issuing and checking.
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    jwt_service: JwtService,
    access_token_ttl_seconds: i64,
}

impl AuthService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        jwt_service: JwtService,
        access_token_ttl_seconds: i64,
    ) -> Self {
        Self {
            identity,
            jwt_service,
            access_token_ttl_seconds,
        }
    }

    pub fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity
    }

    pub async fn sign_in(&self, req: &SignInRequest) -> Result<AuthResponse, AuthError> {
        let result = self.identity.sign_in(req).await;
        record_auth_event("sign_in", &result);
        let session = result?;

        tracing::info!(user_id = %session.user.id, "Successful sign-in");
        self.issue(session)
    }

    pub async fn sign_up(&self, req: &SignUpRequest) -> Result<AuthResponse, AuthError> {
        let result = self.identity.sign_up(req).await;
        record_auth_event("sign_up", &result);
        self.issue(result?)
    }

    pub async fn sign_out(&self, current: &CurrentUser) -> Result<(), AuthError> {
        let result = self.identity.sign_out(current.session_id).await;
        record_auth_event("sign_out", &result);
        result?;

        tracing::info!(user_id = %current.user.id, "Signed out");
        Ok(())
    }

    /// Validates the token and confirms its session is still live.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, AuthError> {
        let claims = self
            .jwt_service
            .validate_token(token)
            .map_err(|e| AuthError::Token(e.to_string()))?;

        let session_id = Uuid::parse_str(&claims.sid)
            .map_err(|_| AuthError::Token("malformed session id".to_string()))?;

        let user = self
            .identity
            .current_user(session_id)
            .await
            .ok_or(AuthError::SessionNotFound)?;

        if user.id.to_string() != claims.sub {
            return Err(AuthError::Token("subject mismatch".to_string()));
        }

        Ok(CurrentUser { session_id, user })
    }

    fn issue(&self, session: AuthSession) -> Result<AuthResponse, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_token_ttl_seconds);

        let claims = JwtClaims {
            sub: session.user.id.to_string(),
            sid: session.session_id.to_string(),
            role: session.user.role.as_str().to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let access_token = self
            .jwt_service
            .generate_token(&claims)
            .map_err(|e| AuthError::Token(e.to_string()))?;

        Ok(AuthResponse {
            access_token,
            token_type: "Bearer",
            expires_in: self.access_token_ttl_seconds,
            user: session.user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use crate::services::identity::InMemoryIdentityProvider;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryIdentityProvider::with_cost(4)),
            JwtService::new("test-secret"),
            3600,
        )
    }

    fn sign_up_request() -> SignUpRequest {
        SignUpRequest {
            email: "student@example.com".to_string(),
            password: "secret123".to_string(),
            full_name: "Baraka Mwangi".to_string(),
            role: UserRole::Student,
        }
    }

    #[tokio::test]
    async fn test_issued_token_authenticates() {
        let service = service();
        let response = service.sign_up(&sign_up_request()).await.unwrap();
        assert_eq!(response.token_type, "Bearer");

        let current = service.authenticate(&response.access_token).await.unwrap();
        assert_eq!(current.user.id, response.user.id);
    }

    #[tokio::test]
    async fn test_token_is_dead_after_sign_out() {
        let service = service();
        let response = service.sign_up(&sign_up_request()).await.unwrap();
        let current = service.authenticate(&response.access_token).await.unwrap();

        service.sign_out(&current).await.unwrap();

        assert_eq!(
            service
                .authenticate(&response.access_token)
                .await
                .unwrap_err(),
            AuthError::SessionNotFound
        );
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        assert!(matches!(
            service().authenticate("not-a-jwt").await,
            Err(AuthError::Token(_))
        ));
    }
}
