//! Repository implementations for SQLite
//!
//! CRUD operations for all tables. Read paths take the pool; mutation
//! entry points are generic over the executor so the ledger can run them
//! inside one sqlx transaction (balance write + log append + bill flip
//! commit together or not at all).

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::schema::*;
use minibank_core::AccountType;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::{Executor, Sqlite, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

/// How long a writer waits on the SQLite write lock before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// User Repository
// ============================================================================

/// Repository for the users table
pub struct UserRepo;

impl UserRepo {
    pub async fn insert<'e, E>(executor: E, user: &UserRow) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "INSERT INTO users (id, email, name, password, phone, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password)
        .bind(&user.phone)
        .bind(user.created_at)
        .execute(executor)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PersistenceError::already_exists("User", &user.email)
            }
            _ => PersistenceError::Database(e),
        })?;
        Ok(())
    }

    pub async fn get_by_id(pool: &SqlitePool, id: &str) -> PersistenceResult<UserRow> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| PersistenceError::not_found("User", id))
    }

    /// Lookup by email; the stored email is lowercase
    pub async fn get_by_email(pool: &SqlitePool, email: &str) -> PersistenceResult<UserRow> {
        let email = email.to_lowercase();
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| PersistenceError::not_found("User", &email))
    }

    pub async fn update_profile(
        pool: &SqlitePool,
        id: &str,
        name: &str,
        phone: Option<&str>,
    ) -> PersistenceResult<()> {
        sqlx::query("UPDATE users SET name = ?, phone = ? WHERE id = ?")
            .bind(name)
            .bind(phone)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn update_password(
        pool: &SqlitePool,
        id: &str,
        password: &str,
    ) -> PersistenceResult<()> {
        sqlx::query("UPDATE users SET password = ? WHERE id = ?")
            .bind(password)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

// ============================================================================
// Account Repository
// ============================================================================

/// Repository for the accounts table.
///
/// Balances are written only by the transaction processor, which holds the
/// per-account lock while calling `set_balance` inside its transaction.
pub struct AccountRepo;

impl AccountRepo {
    pub async fn insert<'e, E>(executor: E, account: &AccountRow) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, user_id, name, type, balance, card_number, apy, fees, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.id)
        .bind(&account.user_id)
        .bind(&account.name)
        .bind(&account.account_type)
        .bind(&account.balance)
        .bind(&account.card_number)
        .bind(account.apy)
        .bind(account.fees)
        .bind(&account.status)
        .bind(account.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn get_by_id(pool: &SqlitePool, id: &str) -> PersistenceResult<AccountRow> {
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Account", id))
    }

    /// All accounts of a user, oldest first
    pub async fn get_by_user(pool: &SqlitePool, user_id: &str) -> PersistenceResult<Vec<AccountRow>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT * FROM accounts WHERE user_id = ? ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// The unique account for (user, type)
    pub async fn get_by_user_and_type(
        pool: &SqlitePool,
        user_id: &str,
        account_type: AccountType,
    ) -> PersistenceResult<AccountRow> {
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE user_id = ? AND type = ?")
            .bind(user_id)
            .bind(account_type.as_str())
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                PersistenceError::not_found("Account", &format!("{user_id}:{account_type}"))
            })
    }

    pub async fn set_balance<'e, E>(
        executor: E,
        id: &str,
        balance: Decimal,
    ) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE accounts SET balance = ? WHERE id = ?")
            .bind(balance.to_string())
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn set_status(pool: &SqlitePool, id: &str, status: &str) -> PersistenceResult<()> {
        sqlx::query("UPDATE accounts SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn rename(pool: &SqlitePool, id: &str, name: &str) -> PersistenceResult<()> {
        sqlx::query("UPDATE accounts SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

// ============================================================================
// Card Repository
// ============================================================================

/// Repository for the cards table
pub struct CardRepo;

impl CardRepo {
    pub async fn insert<'e, E>(executor: E, card: &CardRow) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO cards (id, user_id, account_id, type, number, holder, expiry, status, card_limit, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&card.id)
        .bind(&card.user_id)
        .bind(&card.account_id)
        .bind(&card.card_type)
        .bind(&card.number)
        .bind(&card.holder)
        .bind(&card.expiry)
        .bind(&card.status)
        .bind(&card.card_limit)
        .bind(card.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn get_by_user(pool: &SqlitePool, user_id: &str) -> PersistenceResult<Vec<CardRow>> {
        let rows = sqlx::query_as::<_, CardRow>(
            "SELECT * FROM cards WHERE user_id = ? ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn set_status(pool: &SqlitePool, id: &str, status: &str) -> PersistenceResult<()> {
        sqlx::query("UPDATE cards SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

// ============================================================================
// Transaction Repository
// ============================================================================

/// Repository for the append-only transactions table
pub struct TransactionRepo;

impl TransactionRepo {
    pub async fn insert<'e, E>(executor: E, tx: &TransactionRow) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, user_id, from_account_id, to_account_id, amount, description, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&tx.id)
        .bind(&tx.user_id)
        .bind(&tx.from_account_id)
        .bind(&tx.to_account_id)
        .bind(&tx.amount)
        .bind(&tx.description)
        .bind(&tx.status)
        .bind(tx.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Recent transactions of a user, newest first, capped at 50
    pub async fn get_by_user(
        pool: &SqlitePool,
        user_id: &str,
    ) -> PersistenceResult<Vec<TransactionRow>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            "SELECT * FROM transactions WHERE user_id = ? ORDER BY created_at DESC LIMIT 50",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// All transactions referencing an account, oldest first
    pub async fn get_by_account(
        pool: &SqlitePool,
        account_id: &str,
    ) -> PersistenceResult<Vec<TransactionRow>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT * FROM transactions
            WHERE from_account_id = ? OR to_account_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(account_id)
        .bind(account_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Signed sum of all amounts referencing an account.
    ///
    /// Summed in Decimal, not SQL, so TEXT amounts never round through
    /// floating point. Equals the stored balance when the ledger is
    /// consistent.
    pub async fn sum_for_account(pool: &SqlitePool, account_id: &str) -> PersistenceResult<Decimal> {
        let rows = Self::get_by_account(pool, account_id).await?;
        let mut sum = Decimal::ZERO;
        for row in rows {
            let amount = Decimal::from_str(&row.amount)
                .map_err(|_| PersistenceError::InvalidDecimal(row.amount.clone()))?;
            sum += amount;
        }
        Ok(sum)
    }

    pub async fn count_for_account(pool: &SqlitePool, account_id: &str) -> PersistenceResult<i64> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM transactions WHERE from_account_id = ? OR to_account_id = ?",
        )
        .bind(account_id)
        .bind(account_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Bill Repository
// ============================================================================

/// Repository for the bills table
pub struct BillRepo;

impl BillRepo {
    pub async fn insert<'e, E>(executor: E, bill: &BillRow) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO bills (id, user_id, biller_name, amount, due_date, category, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&bill.id)
        .bind(&bill.user_id)
        .bind(&bill.biller_name)
        .bind(&bill.amount)
        .bind(bill.due_date)
        .bind(&bill.category)
        .bind(&bill.status)
        .bind(bill.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn get_by_id(pool: &SqlitePool, id: &str) -> PersistenceResult<BillRow> {
        sqlx::query_as::<_, BillRow>("SELECT * FROM bills WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Bill", id))
    }

    /// A user's bills ordered by due date
    pub async fn get_by_user(pool: &SqlitePool, user_id: &str) -> PersistenceResult<Vec<BillRow>> {
        let rows = sqlx::query_as::<_, BillRow>(
            "SELECT * FROM bills WHERE user_id = ? ORDER BY due_date",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_for_user<'e, E>(executor: E, user_id: &str) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bills WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }

    /// Flip a bill to paid, but only if it is still pending.
    ///
    /// Returns the number of rows changed: 0 means the bill was already
    /// paid (or vanished) and the caller must abort its transaction.
    pub async fn mark_paid<'e, E>(executor: E, id: &str) -> PersistenceResult<u64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE bills SET status = 'paid' WHERE id = ? AND status = 'pending'")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

// ============================================================================
// Loan Repository
// ============================================================================

/// Repository for the loans table
pub struct LoanRepo;

impl LoanRepo {
    pub async fn insert<'e, E>(executor: E, loan: &LoanRow) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO loans (id, user_id, loan_type, principal_amount, remaining_amount,
                               interest_rate, monthly_payment, start_date, end_date, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&loan.id)
        .bind(&loan.user_id)
        .bind(&loan.loan_type)
        .bind(&loan.principal_amount)
        .bind(&loan.remaining_amount)
        .bind(loan.interest_rate)
        .bind(&loan.monthly_payment)
        .bind(loan.start_date)
        .bind(loan.end_date)
        .bind(&loan.status)
        .bind(loan.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// A user's loans, newest first
    pub async fn get_by_user(pool: &SqlitePool, user_id: &str) -> PersistenceResult<Vec<LoanRow>> {
        let rows = sqlx::query_as::<_, LoanRow>(
            "SELECT * FROM loans WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}

// ============================================================================
// Database initialization
// ============================================================================

/// Connection options shared by every pool: WAL journaling and a bounded
/// wait on the write lock.
pub fn connect_options(database_url: &str) -> PersistenceResult<SqliteConnectOptions> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);
    Ok(options)
}

/// Create a connection pool
pub async fn create_pool(database_url: &str) -> PersistenceResult<SqlitePool> {
    let pool = SqlitePool::connect_with(connect_options(database_url)?).await?;
    Ok(pool)
}

/// Run migrations
pub async fn run_migrations(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Create the database (if missing) and bring the schema up to date
pub async fn init_database(database_url: &str) -> PersistenceResult<SqlitePool> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
