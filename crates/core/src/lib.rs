//! # Minibank Core
//!
//! Domain types for the Minibank ledger: accounts, transactions, bills,
//! loans, cards and users, plus the pure loan amortization calculator.
//!
//! This crate knows nothing about storage or concurrency. Balance mutation
//! rules live in `minibank-ledger`; persistence lives in
//! `minibank-persistence`.

pub mod account;
pub mod bill;
pub mod card;
pub mod error;
pub mod loan;
pub mod transaction;
pub mod user;

pub use account::{Account, AccountStatus, AccountType};
pub use bill::{Bill, BillStatus, DEFAULT_BILLS};
pub use card::{Card, CardStatus, CardType};
pub use error::{CoreError, CoreResult};
pub use loan::{interest_rate_for, originate, Loan, LoanStatus, LoanTerms, DEFAULT_TENURE_MONTHS};
pub use transaction::{Transaction, TransactionStatus};
pub use user::User;
