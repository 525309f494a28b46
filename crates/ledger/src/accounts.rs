//! Account administration
//!
//! Status flips, renames and reads. Balances are out of bounds here; only
//! the transaction processor writes them.

use crate::error::{LedgerError, LedgerResult};
use crate::services::ServiceContext;
use minibank_core::{Account, AccountStatus};
use minibank_persistence::AccountRepo;
use tracing::info;

/// Reads and administers accounts
pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// A user's accounts, oldest first
    pub async fn list(&self, user_id: &str) -> LedgerResult<Vec<Account>> {
        let rows = AccountRepo::get_by_user(self.ctx.pool(), user_id).await?;
        rows.into_iter()
            .map(|row| Account::try_from(row).map_err(LedgerError::from))
            .collect()
    }

    /// Fetch one account
    pub async fn get(&self, account_id: &str) -> LedgerResult<Account> {
        let row = AccountRepo::get_by_id(self.ctx.pool(), account_id).await?;
        Account::try_from(row).map_err(LedgerError::from)
    }

    /// Freeze an account; mutations will be rejected while enforcement is on
    pub async fn freeze(&self, account_id: &str) -> LedgerResult<AccountStatus> {
        self.set_status(account_id, AccountStatus::Frozen).await
    }

    /// Return a frozen account to active
    pub async fn unfreeze(&self, account_id: &str) -> LedgerResult<AccountStatus> {
        self.set_status(account_id, AccountStatus::Active).await
    }

    /// Change the display name
    pub async fn rename(&self, account_id: &str, name: &str) -> LedgerResult<()> {
        // Existence check keeps a rename of a ghost account from silently
        // succeeding
        self.get(account_id).await?;
        AccountRepo::rename(self.ctx.pool(), account_id, name).await?;
        Ok(())
    }

    async fn set_status(
        &self,
        account_id: &str,
        status: AccountStatus,
    ) -> LedgerResult<AccountStatus> {
        self.get(account_id).await?;
        AccountRepo::set_status(self.ctx.pool(), account_id, status.as_str()).await?;
        info!(account = %account_id, status = %status, "account status changed");
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::setup;

    #[tokio::test]
    async fn test_list_returns_both_accounts() {
        let (_dir, ctx, reg) = setup().await;
        let service = AccountService::new(&ctx);

        let accounts = service.list(&reg.user_id).await.unwrap();
        assert_eq!(accounts.len(), 2);
        let types: Vec<_> = accounts.iter().map(|a| a.account_type.as_str()).collect();
        assert!(types.contains(&"checking"));
        assert!(types.contains(&"savings"));
    }

    #[tokio::test]
    async fn test_freeze_and_unfreeze() {
        let (_dir, ctx, reg) = setup().await;
        let service = AccountService::new(&ctx);

        service.freeze(&reg.checking_account_id).await.unwrap();
        let account = service.get(&reg.checking_account_id).await.unwrap();
        assert!(account.is_frozen());

        service.unfreeze(&reg.checking_account_id).await.unwrap();
        let account = service.get(&reg.checking_account_id).await.unwrap();
        assert!(account.is_active());
    }

    #[tokio::test]
    async fn test_rename() {
        let (_dir, ctx, reg) = setup().await;
        let service = AccountService::new(&ctx);

        service.rename(&reg.checking_account_id, "Rainy Day").await.unwrap();
        let account = service.get(&reg.checking_account_id).await.unwrap();
        assert_eq!(account.name, "Rainy Day");
    }

    #[tokio::test]
    async fn test_unknown_account_is_not_found() {
        let (_dir, ctx, _reg) = setup().await;
        let service = AccountService::new(&ctx);

        assert!(service.get("ghost").await.unwrap_err().is_not_found());
        assert!(service.freeze("ghost").await.unwrap_err().is_not_found());
        assert!(service.rename("ghost", "x").await.unwrap_err().is_not_found());
    }
}
