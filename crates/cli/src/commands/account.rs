//! Account and user commands

use crate::{commands, db, AuthArgs};
use anyhow::{bail, Result};
use minibank_core::CardStatus;
use minibank_ledger::{
    AccountService, ProfileService, RegistrationService, ServiceContext, SessionService,
};
use minibank_persistence::CardRepo;
use std::path::Path;

/// Register a new user
pub async fn register(db_path: &Path, name: &str, email: &str, password: &str) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let ctx = ServiceContext::new(pool.clone());

    let reg = RegistrationService::new(&ctx)
        .register(name, email, password)
        .await?;

    println!("✅ Registered {}", email.to_lowercase());
    println!("   User ID:          {}", reg.user_id);
    println!("   Checking account: {}", reg.checking_account_id);
    println!("   Savings account:  {}", reg.savings_account_id);
    println!("   Cards:            debit + credit");
    println!("   Starter bills:    5 pending");

    pool.close().await;
    Ok(())
}

/// Verify credentials and print a session token
pub async fn login(db_path: &Path, email: &str, password: &str) -> Result<()> {
    let pool = db::connect(db_path).await?;

    let sessions = SessionService::new();
    let receipt = sessions.login(&pool, email, password).await?;

    println!("✅ Welcome back, {}!", receipt.name);
    println!("   Token: {}", receipt.token);
    println!("   (sessions live in-process; each CLI run authenticates anew)");

    pool.close().await;
    Ok(())
}

/// List the caller's accounts
pub async fn list(db_path: &Path, auth: &AuthArgs) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let identity = commands::authenticate(&pool, auth).await?;
    let ctx = ServiceContext::new(pool.clone());

    let accounts = AccountService::new(&ctx).list(&identity.user_id).await?;
    println!("📒 {} account(s)", accounts.len());
    for account in accounts {
        println!(
            "   {}  {:<10} {:<10} {:>14}  {}",
            account.id, account.account_type, account.status, account.balance, account.name
        );
    }

    pool.close().await;
    Ok(())
}

/// Show one account
pub async fn show(db_path: &Path, auth: &AuthArgs, account_id: &str) -> Result<()> {
    let pool = db::connect(db_path).await?;
    commands::authenticate(&pool, auth).await?;
    let ctx = ServiceContext::new(pool.clone());

    let account = AccountService::new(&ctx).get(account_id).await?;
    println!("📒 Account {}", account.id);
    println!("   Name:    {}", account.name);
    println!("   Type:    {}", account.account_type);
    println!("   Number:  {}", account.card_number);
    println!("   Balance: {}", account.balance);
    println!("   APY:     {}", account.apy);
    println!("   Status:  {}", account.status);

    pool.close().await;
    Ok(())
}

/// Freeze or unfreeze an account
pub async fn set_frozen(
    db_path: &Path,
    auth: &AuthArgs,
    account_id: &str,
    frozen: bool,
) -> Result<()> {
    let pool = db::connect(db_path).await?;
    commands::authenticate(&pool, auth).await?;
    let ctx = ServiceContext::new(pool.clone());

    let service = AccountService::new(&ctx);
    let status = if frozen {
        service.freeze(account_id).await?
    } else {
        service.unfreeze(account_id).await?
    };
    println!("✅ Account {} is now {}", account_id, status);

    pool.close().await;
    Ok(())
}

/// Rename an account
pub async fn rename(db_path: &Path, auth: &AuthArgs, account_id: &str, name: &str) -> Result<()> {
    let pool = db::connect(db_path).await?;
    commands::authenticate(&pool, auth).await?;
    let ctx = ServiceContext::new(pool.clone());

    AccountService::new(&ctx).rename(account_id, name).await?;
    println!("✅ Account {} renamed to \"{}\"", account_id, name);

    pool.close().await;
    Ok(())
}

/// List the caller's cards
pub async fn cards(db_path: &Path, auth: &AuthArgs) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let identity = commands::authenticate(&pool, auth).await?;

    let cards = CardRepo::get_by_user(&pool, &identity.user_id).await?;
    println!("💳 {} card(s)", cards.len());
    for card in cards {
        println!(
            "   {}  {:<7} {:<8} {}  exp {}  limit {}",
            card.id, card.card_type, card.status, card.number, card.expiry, card.card_limit
        );
    }

    pool.close().await;
    Ok(())
}

/// Set a card's status
pub async fn set_card_status(
    db_path: &Path,
    auth: &AuthArgs,
    card_id: &str,
    status: &str,
) -> Result<()> {
    let Some(status) = CardStatus::from_str(status) else {
        bail!("Invalid card status: {status} (expected active or blocked)");
    };

    let pool = db::connect(db_path).await?;
    commands::authenticate(&pool, auth).await?;

    CardRepo::set_status(&pool, card_id, status.as_str()).await?;
    println!("✅ Card {} is now {}", card_id, status);

    pool.close().await;
    Ok(())
}

/// Show the caller's profile
pub async fn profile(db_path: &Path, auth: &AuthArgs) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let identity = commands::authenticate(&pool, auth).await?;
    let ctx = ServiceContext::new(pool.clone());

    let user = ProfileService::new(&ctx).get(&identity.user_id).await?;
    println!("👤 {}", user.name);
    println!("   Email: {}", user.email);
    println!("   Phone: {}", user.phone.as_deref().unwrap_or("-"));
    println!("   Since: {}", user.created_at.format("%Y-%m-%d"));

    pool.close().await;
    Ok(())
}

/// Update display name and phone
pub async fn update_profile(
    db_path: &Path,
    auth: &AuthArgs,
    name: &str,
    phone: Option<&str>,
) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let identity = commands::authenticate(&pool, auth).await?;
    let ctx = ServiceContext::new(pool.clone());

    ProfileService::new(&ctx)
        .update(&identity.user_id, name, phone)
        .await?;
    println!("✅ Profile updated");

    pool.close().await;
    Ok(())
}

/// Change the password; the current one comes from --password
pub async fn change_password(
    db_path: &Path,
    auth: &AuthArgs,
    new_password: &str,
    confirm_password: &str,
) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let identity = commands::authenticate(&pool, auth).await?;
    let ctx = ServiceContext::new(pool.clone());

    ProfileService::new(&ctx)
        .change_password(&identity.user_id, &auth.password, new_password, confirm_password)
        .await?;
    println!("✅ Password changed");

    pool.close().await;
    Ok(())
}
