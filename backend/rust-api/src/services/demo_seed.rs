use anyhow::{Context, Result};

use super::identity::{AuthError, IdentityProvider};
use crate::models::user::{SignUpRequest, UserRole};

pub const DEMO_PASSWORD: &str = "studybuddy";

struct DemoAccount {
    email: &'static str,
    full_name: &'static str,
    role: UserRole,
}

const DEMO_ACCOUNTS: [DemoAccount; 2] = [
    DemoAccount {
        email: "student@studybuddy.test",
        full_name: "Demo Student",
        role: UserRole::Student,
    },
    DemoAccount {
        email: "teacher@studybuddy.test",
        full_name: "Demo Teacher",
        role: UserRole::Teacher,
    },
];

/// Registers one demo student and one demo teacher. Accounts that already
/// exist are left alone. Returns the number of accounts created.
pub async fn bootstrap(identity: &dyn IdentityProvider) -> Result<usize> {
    let mut created = 0;

    for account in &DEMO_ACCOUNTS {
        let req = SignUpRequest {
            email: account.email.to_string(),
            password: DEMO_PASSWORD.to_string(),
            full_name: account.full_name.to_string(),
            role: account.role,
        };

        match identity.sign_up(&req).await {
            Ok(session) => {
                // Registration signs the account in; the seed has no use for that session.
                identity
                    .sign_out(session.session_id)
                    .await
                    .context("Failed to close demo seed session")?;
                tracing::info!("Seeded demo {} account {}", account.role.as_str(), account.email);
                created += 1;
            }
            Err(AuthError::AlreadyRegistered) => {
                tracing::info!("Demo account {} already exists, seed skipped", account.email);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to seed demo account {}", account.email));
            }
        }
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::SignInRequest;
    use crate::services::identity::InMemoryIdentityProvider;

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let identity = InMemoryIdentityProvider::with_cost(4);

        assert_eq!(bootstrap(&identity).await.unwrap(), 2);
        assert_eq!(bootstrap(&identity).await.unwrap(), 0);

        let again = SignUpRequest {
            email: "student@studybuddy.test".to_string(),
            password: DEMO_PASSWORD.to_string(),
            full_name: "Second Student".to_string(),
            role: UserRole::Student,
        };
        assert_eq!(
            identity.sign_up(&again).await.unwrap_err(),
            AuthError::AlreadyRegistered
        );
    }

    #[tokio::test]
    async fn test_demo_teacher_can_sign_in() {
        let identity = InMemoryIdentityProvider::with_cost(4);
        bootstrap(&identity).await.unwrap();

        let session = identity
            .sign_in(&SignInRequest {
                email: "teacher@studybuddy.test".to_string(),
                password: DEMO_PASSWORD.to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.user.role, UserRole::Teacher);
    }
}
