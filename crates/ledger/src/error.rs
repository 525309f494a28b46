//! Ledger errors
//!
//! The full error taxonomy surfaced to callers of the processor and its
//! sibling services. Validation errors are raised before anything is
//! written; storage failures abort the whole atomic unit.

use minibank_core::CoreError;
use minibank_persistence::PersistenceError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors produced by ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    // === Validation errors ===
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("Account frozen: {account_id}")]
    AccountFrozen { account_id: String },

    #[error("Bill already paid: {bill_id}")]
    BillAlreadyPaid { bill_id: String },

    // === Lookup errors ===
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    // === Registration errors ===
    #[error("Email already registered: {email}")]
    EmailAlreadyRegistered { email: String },

    #[error("Invalid registration: {0}")]
    InvalidRegistration(String),

    #[error("Invalid profile update: {0}")]
    InvalidProfile(String),

    // === Auth errors ===
    #[error("Unauthenticated")]
    Unauthenticated,

    // === Contention ===
    #[error("Account busy: {account_id}")]
    Busy { account_id: String },

    // === Wrapped errors ===
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Persistence error: {0}")]
    Persistence(PersistenceError),
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    /// Create an InvalidAmount error for a non-positive amount
    pub fn invalid_amount(operation: &str, amount: Decimal) -> Self {
        Self::InvalidAmount(format!("{operation} amount must be positive: {amount}"))
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(required: Decimal, available: Decimal) -> Self {
        Self::InsufficientFunds {
            required,
            available,
        }
    }

    /// Create a NotFound error
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Check whether this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// Storage "not found" surfaces as the ledger's own NotFound so callers can
// match one taxonomy; everything else stays wrapped.
impl From<PersistenceError> for LedgerError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { entity, id } => LedgerError::NotFound { entity, id },
            other => LedgerError::Persistence(other),
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Persistence(PersistenceError::Database(err))
    }
}
