//! User onboarding
//!
//! Registration creates the user, a checking and a savings account, a
//! debit and a credit card, and the user's five starter bills in one
//! atomic unit. Bill seeding is an explicit idempotent step here rather
//! than a side effect of reading the bill list, so read paths never write.

use crate::error::{LedgerError, LedgerResult};
use crate::services::{RegisteredUser, ServiceContext};
use chrono::{Duration, Utc};
use minibank_core::{
    Account, AccountType, Bill, BillStatus, Card, CardStatus, CardType, User, DEFAULT_BILLS,
};
use minibank_persistence::{
    AccountRepo, AccountRow, BillRepo, BillRow, CardRepo, CardRow, UserRepo, UserRow,
};
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::SqliteConnection;
use std::str::FromStr;
use tracing::info;

/// Registers new users and seeds their starter records
pub struct RegistrationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RegistrationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a user with two zero-balance accounts, two cards and five
    /// pending bills. Everything commits together or not at all.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> LedgerResult<RegisteredUser> {
        let name = name.trim();
        let email = email.trim().to_lowercase();

        if name.is_empty() {
            return Err(LedgerError::InvalidRegistration(
                "Name is required".to_string(),
            ));
        }
        if !email_is_valid(&email) {
            return Err(LedgerError::InvalidRegistration(
                "Invalid email format".to_string(),
            ));
        }
        if password.len() < 6 {
            return Err(LedgerError::InvalidRegistration(
                "Password must be at least 6 characters".to_string(),
            ));
        }

        match UserRepo::get_by_email(self.ctx.pool(), &email).await {
            Ok(_) => return Err(LedgerError::EmailAlreadyRegistered { email }),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }

        let user = User::new(
            uuid::Uuid::new_v4().to_string(),
            email,
            name.to_string(),
            password.to_string(),
        );

        // All randomness happens up front; the write path below is plain
        let (checking_number, savings_number, debit_last4, credit_last4) = {
            let mut rng = rand::thread_rng();
            (
                display_number(&mut rng, "4829"),
                display_number(&mut rng, "5012"),
                rng.gen_range(1000..=9999),
                rng.gen_range(1000..=9999),
            )
        };

        let checking = Account::new(
            uuid::Uuid::new_v4().to_string(),
            user.id.clone(),
            AccountType::Checking,
            checking_number,
            0.0,
        );
        let savings = Account::new(
            uuid::Uuid::new_v4().to_string(),
            user.id.clone(),
            AccountType::Savings,
            savings_number,
            2.5,
        );

        let debit_card = new_card(
            &user,
            &checking.id,
            CardType::Debit,
            &format!("6789 •••• •••• {debit_last4}"),
            "12/26",
            Decimal::new(5000, 0),
        );
        let credit_card = new_card(
            &user,
            &savings.id,
            CardType::Credit,
            &format!("8765 •••• •••• {credit_last4}"),
            "03/27",
            Decimal::new(10000, 0),
        );

        let mut tx = self.ctx.pool().begin().await?;
        // The unique index backs up the pre-check: two racing registrations
        // of one email cannot both commit
        UserRepo::insert(&mut *tx, &UserRow::from(&user))
            .await
            .map_err(|e| match e {
                minibank_persistence::PersistenceError::AlreadyExists { id, .. } => {
                    LedgerError::EmailAlreadyRegistered { email: id }
                }
                other => other.into(),
            })?;
        AccountRepo::insert(&mut *tx, &AccountRow::from(&checking)).await?;
        AccountRepo::insert(&mut *tx, &AccountRow::from(&savings)).await?;
        CardRepo::insert(&mut *tx, &CardRow::from(&debit_card)).await?;
        CardRepo::insert(&mut *tx, &CardRow::from(&credit_card)).await?;
        seed_bills(&mut *tx, &user.id).await?;
        tx.commit().await?;

        info!(user = %user.id, "user registered");
        Ok(RegisteredUser {
            user_id: user.id,
            checking_account_id: checking.id,
            savings_account_id: savings.id,
        })
    }
}

/// Seed the five starter bills for a user if they have none yet.
///
/// Idempotent: returns the number of bills inserted (0 when already
/// seeded). Runs on the caller's connection so registration can include
/// it in its transaction.
pub async fn seed_bills(conn: &mut SqliteConnection, user_id: &str) -> LedgerResult<usize> {
    let existing = BillRepo::count_for_user(&mut *conn, user_id).await?;
    if existing > 0 {
        return Ok(0);
    }

    let due_offsets: Vec<i64> = {
        let mut rng = rand::thread_rng();
        DEFAULT_BILLS.iter().map(|_| rng.gen_range(5..=25)).collect()
    };

    let now = Utc::now();
    for ((biller, amount, category), offset) in DEFAULT_BILLS.into_iter().zip(due_offsets) {
        let bill = Bill {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            biller_name: biller.to_string(),
            // DEFAULT_BILLS amounts are fixed decimal literals
            amount: Decimal::from_str(amount).expect("seed amount"),
            due_date: now + Duration::days(offset),
            category: category.to_string(),
            status: BillStatus::Pending,
            created_at: now,
        };
        BillRepo::insert(&mut *conn, &BillRow::from(&bill)).await?;
    }
    Ok(DEFAULT_BILLS.len())
}

fn new_card(
    user: &User,
    account_id: &str,
    card_type: CardType,
    number: &str,
    expiry: &str,
    limit: Decimal,
) -> Card {
    Card {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        account_id: account_id.to_string(),
        card_type,
        number: number.to_string(),
        holder: user.name.to_uppercase(),
        expiry: expiry.to_string(),
        status: CardStatus::Active,
        limit,
        created_at: Utc::now(),
    }
}

fn display_number(rng: &mut impl Rng, prefix: &str) -> String {
    format!(
        "{prefix}{:08}{:04}",
        rng.gen_range(10_000_000..=99_999_999u64),
        rng.gen_range(1000..=9999u64)
    )
}

fn email_is_valid(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}
