//! # Transaction Module
//!
//! An immutable, append-only record of one committed balance change.
//! Rejected operations never produce a transaction, so `completed` is the
//! only status ever written.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// The only terminal state; there are no pending or failed records
    Completed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "completed" => Some(TransactionStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One committed money movement.
///
/// The signed `amount` is relative to the referenced account(s): debits are
/// negative with `from_account_id` set, credits are positive with
/// `to_account_id` set, and deposits set both to the same account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub amount: Decimal,
    pub description: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Record a debit of `amount` against `account_id` (stored negated)
    pub fn debit(user_id: &str, account_id: &str, amount: Decimal, description: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            from_account_id: Some(account_id.to_string()),
            to_account_id: None,
            amount: -amount,
            description: description.to_string(),
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
        }
    }

    /// Record a credit of `amount` into `account_id`
    pub fn credit(user_id: &str, account_id: &str, amount: Decimal, description: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            from_account_id: None,
            to_account_id: Some(account_id.to_string()),
            amount,
            description: description.to_string(),
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
        }
    }

    /// Record a deposit: both references point at the receiving account
    pub fn deposit(user_id: &str, account_id: &str, amount: Decimal, description: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            from_account_id: Some(account_id.to_string()),
            to_account_id: Some(account_id.to_string()),
            amount,
            description: description.to_string(),
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
        }
    }

    /// Whether this transaction references the given account
    pub fn references(&self, account_id: &str) -> bool {
        self.from_account_id.as_deref() == Some(account_id)
            || self.to_account_id.as_deref() == Some(account_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_debit_negates_amount() {
        let tx = Transaction::debit("user-1", "acc-1", dec!(200), "rent");
        assert_eq!(tx.amount, dec!(-200));
        assert_eq!(tx.from_account_id.as_deref(), Some("acc-1"));
        assert_eq!(tx.to_account_id, None);
        assert_eq!(tx.status, TransactionStatus::Completed);
    }

    #[test]
    fn test_deposit_references_account_on_both_sides() {
        let tx = Transaction::deposit("user-1", "acc-1", dec!(500), "Deposit ৳500");
        assert_eq!(tx.amount, dec!(500));
        assert!(tx.references("acc-1"));
        assert_eq!(tx.from_account_id, tx.to_account_id);
    }

    #[test]
    fn test_references() {
        let tx = Transaction::credit("user-1", "acc-2", dec!(75), "incoming transfer");
        assert!(tx.references("acc-2"));
        assert!(!tx.references("acc-1"));
    }
}
