//! Command handlers

pub mod account;
pub mod loan;
pub mod money;

use crate::AuthArgs;
use anyhow::Result;
use minibank_ledger::{Identity, SessionService};
use sqlx::SqlitePool;

/// Log in and resolve the caller's identity, the way the request layer
/// would: credentials to token, token to identity.
pub async fn authenticate(pool: &SqlitePool, auth: &AuthArgs) -> Result<Identity> {
    let sessions = SessionService::new();
    let login = sessions.login(pool, &auth.email, &auth.password).await?;
    let identity = sessions.resolve(&login.token).await?;
    Ok(identity)
}
