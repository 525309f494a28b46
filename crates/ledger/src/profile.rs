//! Profile administration
//!
//! Name/phone updates and password changes for an already-authenticated
//! user. Neither touches accounts or balances.

use crate::error::{LedgerError, LedgerResult};
use crate::services::ServiceContext;
use minibank_core::User;
use minibank_persistence::UserRepo;
use tracing::info;

/// Updates user profiles and credentials
pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fetch the caller's profile
    pub async fn get(&self, user_id: &str) -> LedgerResult<User> {
        let row = UserRepo::get_by_id(self.ctx.pool(), user_id).await?;
        Ok(User::from(row))
    }

    /// Update display name and phone; the name is required
    pub async fn update(
        &self,
        user_id: &str,
        name: &str,
        phone: Option<&str>,
    ) -> LedgerResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::InvalidProfile("Name is required".to_string()));
        }
        // Existence check before the blind UPDATE
        UserRepo::get_by_id(self.ctx.pool(), user_id).await?;
        UserRepo::update_profile(self.ctx.pool(), user_id, name, phone).await?;
        info!(user = %user_id, "profile updated");
        Ok(())
    }

    /// Change the password after verifying the current one
    pub async fn change_password(
        &self,
        user_id: &str,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> LedgerResult<()> {
        if new_password.len() < 6 {
            return Err(LedgerError::InvalidProfile(
                "New password must be at least 6 characters".to_string(),
            ));
        }
        if new_password != confirm_password {
            return Err(LedgerError::InvalidProfile(
                "Passwords do not match".to_string(),
            ));
        }

        let user = UserRepo::get_by_id(self.ctx.pool(), user_id).await?;
        if user.password != old_password {
            return Err(LedgerError::Unauthenticated);
        }

        UserRepo::update_password(self.ctx.pool(), user_id, new_password).await?;
        info!(user = %user_id, "password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionService;
    use crate::testutil::setup;

    #[tokio::test]
    async fn test_update_profile() {
        let (_dir, ctx, reg) = setup().await;
        let service = ProfileService::new(&ctx);

        service
            .update(&reg.user_id, "Alice Cooper", Some("555-0100"))
            .await
            .unwrap();

        let user = service.get(&reg.user_id).await.unwrap();
        assert_eq!(user.name, "Alice Cooper");
        assert_eq!(user.phone.as_deref(), Some("555-0100"));
    }

    #[tokio::test]
    async fn test_update_requires_name() {
        let (_dir, ctx, reg) = setup().await;
        let err = ProfileService::new(&ctx)
            .update(&reg.user_id, "  ", None)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidProfile(_)));
    }

    #[tokio::test]
    async fn test_change_password_and_login_with_it() {
        let (_dir, ctx, reg) = setup().await;
        ProfileService::new(&ctx)
            .change_password(&reg.user_id, "secret123", "evenbetter", "evenbetter")
            .await
            .unwrap();

        let sessions = SessionService::new();
        assert!(sessions
            .login(ctx.pool(), "alice@example.com", "secret123")
            .await
            .is_err());
        sessions
            .login(ctx.pool(), "alice@example.com", "evenbetter")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_change_password_validations() {
        let (_dir, ctx, reg) = setup().await;
        let service = ProfileService::new(&ctx);

        let too_short = service
            .change_password(&reg.user_id, "secret123", "tiny", "tiny")
            .await
            .unwrap_err();
        assert!(matches!(too_short, LedgerError::InvalidProfile(_)));

        let mismatch = service
            .change_password(&reg.user_id, "secret123", "evenbetter", "different")
            .await
            .unwrap_err();
        assert!(matches!(mismatch, LedgerError::InvalidProfile(_)));

        let wrong_old = service
            .change_password(&reg.user_id, "nope", "evenbetter", "evenbetter")
            .await
            .unwrap_err();
        assert!(matches!(wrong_old, LedgerError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let (_dir, ctx, _reg) = setup().await;
        let err = ProfileService::new(&ctx)
            .update("ghost", "Name", None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
