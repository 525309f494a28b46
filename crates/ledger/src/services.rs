//! Service context and operation results
//!
//! `ServiceContext` bundles what every ledger service needs: the pool, the
//! per-account lock registry and the processor configuration. Each
//! operation returns its own typed receipt instead of a loose dictionary.

use crate::locks::AccountLocks;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::time::Duration;

/// Behavior switches for the transaction processor.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Bounded wait for a per-account lock before returning `Busy`
    pub lock_wait: Duration,
    /// Reject any mutation of a frozen account with `AccountFrozen`
    pub enforce_frozen: bool,
    /// When true, a transfer naming a destination account credits it in
    /// the same atomic unit; when false transfers only debit the source
    pub credit_destination: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            lock_wait: Duration::from_secs(10),
            enforce_frozen: true,
            credit_destination: false,
        }
    }
}

/// Context for ledger operations - pool, locks and configuration
#[derive(Clone)]
pub struct ServiceContext {
    pool: SqlitePool,
    locks: AccountLocks,
    config: ProcessorConfig,
}

impl ServiceContext {
    /// Create a context with default configuration
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_config(pool, ProcessorConfig::default())
    }

    /// Create a context with explicit configuration
    pub fn with_config(pool: SqlitePool, config: ProcessorConfig) -> Self {
        Self {
            pool,
            locks: AccountLocks::new(),
            config,
        }
    }

    /// Get the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the per-account lock registry
    pub fn locks(&self) -> &AccountLocks {
        &self.locks
    }

    /// Get the processor configuration
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }
}

/// Result of a committed transfer
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    /// Id of the debit transaction row
    pub transaction_id: String,
    /// Source account balance after the debit
    pub new_balance: Decimal,
}

/// Result of a committed deposit
#[derive(Debug, Clone)]
pub struct DepositReceipt {
    pub transaction_id: String,
    /// Account that actually received the deposit after type mapping
    pub account_id: String,
    pub new_balance: Decimal,
}

/// Result of a committed bill payment
#[derive(Debug, Clone)]
pub struct BillPaymentReceipt {
    pub transaction_id: String,
    pub bill_id: String,
    pub new_balance: Decimal,
}

/// Result of loan origination
#[derive(Debug, Clone)]
pub struct LoanReceipt {
    pub loan_id: String,
    /// Annual rate in percent
    pub interest_rate: f64,
    pub monthly_payment: Decimal,
}

/// Result of registration
#[derive(Debug, Clone)]
pub struct RegisteredUser {
    pub user_id: String,
    pub checking_account_id: String,
    pub savings_account_id: String,
}

/// Result of a login
#[derive(Debug, Clone)]
pub struct LoginReceipt {
    pub token: String,
    pub user_id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_closes_observed_gaps() {
        let config = ProcessorConfig::default();
        assert!(config.enforce_frozen);
        assert!(!config.credit_destination);
        assert_eq!(config.lock_wait, Duration::from_secs(10));
    }
}
