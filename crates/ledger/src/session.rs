//! Session gate
//!
//! Resolves bearer tokens to user identities. The store is process-wide
//! state with an explicit lifecycle: login issues a token with a bounded
//! TTL, resolve checks and purges expired entries, logout invalidates.
//! It is injected into callers rather than living in a global.

use crate::error::{LedgerError, LedgerResult};
use crate::services::LoginReceipt;
use chrono::{DateTime, Duration, Utc};
use minibank_persistence::UserRepo;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Default session lifetime
const DEFAULT_TTL_MINUTES: i64 = 30;

#[derive(Debug, Clone)]
struct Session {
    user_id: String,
    email: String,
    expires_at: DateTime<Utc>,
}

/// A resolved caller identity
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
}

/// Process-wide token -> identity map with expiry
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionService {
    pub fn new() -> Self {
        Self::with_ttl(Duration::minutes(DEFAULT_TTL_MINUTES))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Verify credentials and issue a token.
    ///
    /// A missing user and a wrong password both come back as
    /// `Unauthenticated`; the caller cannot probe which emails exist.
    pub async fn login(
        &self,
        pool: &SqlitePool,
        email: &str,
        password: &str,
    ) -> LedgerResult<LoginReceipt> {
        let user = match UserRepo::get_by_email(pool, email).await {
            Ok(user) => user,
            Err(e) if e.is_not_found() => return Err(LedgerError::Unauthenticated),
            Err(e) => return Err(e.into()),
        };
        if user.password != password {
            return Err(LedgerError::Unauthenticated);
        }

        let token = uuid::Uuid::new_v4().to_string();
        let session = Session {
            user_id: user.id.clone(),
            email: user.email.clone(),
            expires_at: Utc::now() + self.ttl,
        };
        self.sessions.write().await.insert(token.clone(), session);

        info!(user = %user.id, "session issued");
        Ok(LoginReceipt {
            token,
            user_id: user.id,
            name: user.name,
        })
    }

    /// Resolve a token to an identity; expired tokens are removed
    pub async fn resolve(&self, token: &str) -> LedgerResult<Identity> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => Ok(Identity {
                user_id: session.user_id.clone(),
                email: session.email.clone(),
            }),
            Some(_) => {
                sessions.remove(token);
                Err(LedgerError::Unauthenticated)
            }
            None => Err(LedgerError::Unauthenticated),
        }
    }

    /// Invalidate a token; returns whether it existed
    pub async fn logout(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Drop every expired session, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        before - sessions.len()
    }
}

impl Default for SessionService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::RegistrationService;
    use crate::testutil::setup_empty;

    #[tokio::test]
    async fn test_login_resolve_logout() {
        let (_dir, ctx) = setup_empty().await;
        RegistrationService::new(&ctx)
            .register("Alice", "alice@example.com", "secret123")
            .await
            .unwrap();

        let sessions = SessionService::new();
        let receipt = sessions
            .login(ctx.pool(), "alice@example.com", "secret123")
            .await
            .unwrap();

        let identity = sessions.resolve(&receipt.token).await.unwrap();
        assert_eq!(identity.user_id, receipt.user_id);
        assert_eq!(identity.email, "alice@example.com");

        assert!(sessions.logout(&receipt.token).await);
        let err = sessions.resolve(&receipt.token).await.unwrap_err();
        assert!(matches!(err, LedgerError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_alike() {
        let (_dir, ctx) = setup_empty().await;
        RegistrationService::new(&ctx)
            .register("Alice", "alice@example.com", "secret123")
            .await
            .unwrap();

        let sessions = SessionService::new();
        let wrong_pw = sessions
            .login(ctx.pool(), "alice@example.com", "nope")
            .await
            .unwrap_err();
        let no_user = sessions
            .login(ctx.pool(), "mallory@example.com", "nope")
            .await
            .unwrap_err();
        assert!(matches!(wrong_pw, LedgerError::Unauthenticated));
        assert!(matches!(no_user, LedgerError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected_and_purged() {
        let (_dir, ctx) = setup_empty().await;
        RegistrationService::new(&ctx)
            .register("Alice", "alice@example.com", "secret123")
            .await
            .unwrap();

        let sessions = SessionService::with_ttl(Duration::minutes(-1));
        let receipt = sessions
            .login(ctx.pool(), "alice@example.com", "secret123")
            .await
            .unwrap();

        let err = sessions.resolve(&receipt.token).await.unwrap_err();
        assert!(matches!(err, LedgerError::Unauthenticated));

        // The expired entry is gone, so nothing remains to purge
        assert_eq!(sessions.purge_expired().await, 0);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (_dir, ctx) = setup_empty().await;
        RegistrationService::new(&ctx)
            .register("Alice", "alice@example.com", "secret123")
            .await
            .unwrap();

        let sessions = SessionService::with_ttl(Duration::minutes(-1));
        sessions
            .login(ctx.pool(), "alice@example.com", "secret123")
            .await
            .unwrap();
        sessions
            .login(ctx.pool(), "alice@example.com", "secret123")
            .await
            .unwrap();

        assert_eq!(sessions.purge_expired().await, 2);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let sessions = SessionService::new();
        let err = sessions.resolve("no-such-token").await.unwrap_err();
        assert!(matches!(err, LedgerError::Unauthenticated));
    }
}
