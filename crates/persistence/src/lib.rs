//! # Minibank Persistence
//!
//! SQLite persistence for the Minibank ledger.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  ┌──────────────┐       ┌──────────────────┐  │
//! │  │   SQLite     │ <---- │      Repos       │  │
//! │  │ (WAL, 10 s   │       │ (row types +     │  │
//! │  │  busy wait)  │       │  queries)        │  │
//! │  └──────────────┘       └──────────────────┘  │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Reads go through the pool; mutations used by the ledger's atomic units
//! are generic over the executor so they can join a sqlx transaction.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use minibank_persistence::{init_database, AccountRepo};
//!
//! let pool = init_database("sqlite:minibank.db?mode=rwc").await?;
//! let accounts = AccountRepo::get_by_user(&pool, user_id).await?;
//! ```

pub mod error;
pub mod sqlite;

pub use error::{PersistenceError, PersistenceResult};
pub use sqlite::{
    connect_options, create_pool, init_database, run_migrations, AccountRepo, BillRepo, CardRepo,
    LoanRepo, TransactionRepo, UserRepo,
};
pub use sqlite::{AccountRow, BillRow, CardRow, LoanRow, TransactionRow, UserRow};
