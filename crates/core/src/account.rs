//! # Account Module
//!
//! A balance-holding entity owned by one user. Every user gets a checking
//! and a savings account at registration. Balances are mutated exclusively
//! by the transaction processor in `minibank-ledger`; everything here is
//! plain state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Normal operation
    Active,
    /// Mutations rejected while frozen (when enforcement is enabled)
    Frozen,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Frozen => "frozen",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(AccountStatus::Active),
            "frozen" => Some(AccountStatus::Frozen),
            _ => None,
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account type
///
/// The request layer may send anything; unknown types map to Checking,
/// matching the deposit type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "checking" => Some(AccountType::Checking),
            "savings" => Some(AccountType::Savings),
            _ => None,
        }
    }

    /// Map a requested type to a concrete one, defaulting to Checking
    pub fn from_request(s: &str) -> Self {
        Self::from_str(s).unwrap_or(AccountType::Checking)
    }

    /// Display name used for accounts created at registration
    pub fn default_display_name(&self) -> &'static str {
        match self {
            AccountType::Checking => "Checking Account",
            AccountType::Savings => "Savings Account",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's account.
///
/// Invariant: `balance` equals the signed sum of all committed transactions
/// referencing this account (opening balance is always 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub user_id: String,
    /// Display name, editable by the owner
    pub name: String,
    pub account_type: AccountType,
    pub balance: Decimal,
    /// Display account number (not a card PAN)
    pub card_number: String,
    pub apy: f64,
    pub fees: f64,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(
        id: String,
        user_id: String,
        account_type: AccountType,
        card_number: String,
        apy: f64,
    ) -> Self {
        Self {
            id,
            user_id,
            name: account_type.default_display_name().to_string(),
            account_type,
            balance: Decimal::ZERO,
            card_number,
            apy,
            fees: 0.0,
            status: AccountStatus::Active,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    pub fn is_frozen(&self) -> bool {
        self.status == AccountStatus::Frozen
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, balance: {})",
            self.id, self.account_type, self.status, self.balance
        )
    }
}
