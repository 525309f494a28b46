//! # Minibank Ledger
//!
//! The ledger & transaction processor: the only component that mutates
//! balances, plus the services around it (onboarding, sessions, loans,
//! account administration).
//!
//! ## Correctness contract
//!
//! For any single account the read-validate-write-append sequence of one
//! operation happens entirely before or after any other operation on that
//! account: the processor holds a per-account async mutex across the
//! sequence. The balance write, the transaction append and (for bill
//! payments) the bill status flip commit as one sqlx transaction. Lock
//! acquisition waits a bounded time and then fails with `Busy`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use minibank_ledger::{ServiceContext, TransactionProcessor};
//!
//! let ctx = ServiceContext::new(pool);
//! let processor = TransactionProcessor::new(&ctx);
//! let receipt = processor.deposit(&user_id, "checking", amount).await?;
//! ```

pub mod accounts;
pub mod error;
pub mod loans;
pub mod locks;
pub mod onboarding;
pub mod processor;
pub mod profile;
pub mod services;
pub mod session;

#[cfg(test)]
pub(crate) mod testutil;

pub use accounts::AccountService;
pub use error::{LedgerError, LedgerResult};
pub use loans::LoanService;
pub use locks::{AccountGuard, AccountLocks};
pub use onboarding::{seed_bills, RegistrationService};
pub use processor::TransactionProcessor;
pub use profile::ProfileService;
pub use services::{
    BillPaymentReceipt, DepositReceipt, LoanReceipt, LoginReceipt, ProcessorConfig,
    RegisteredUser, ServiceContext, TransferReceipt,
};
pub use session::{Identity, SessionService};
