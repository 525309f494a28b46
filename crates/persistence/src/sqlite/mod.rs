//! SQLite persistence module
//!
//! Repository pattern for SQLite database access.

pub mod repos;
pub mod schema;

pub use repos::{
    connect_options, create_pool, init_database, run_migrations, AccountRepo, BillRepo, CardRepo,
    LoanRepo, TransactionRepo, UserRepo,
};
pub use schema::{AccountRow, BillRow, CardRow, LoanRow, TransactionRow, UserRow};
