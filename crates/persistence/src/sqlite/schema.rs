//! Database schema definitions
//!
//! Row types for sqlx mapping from the SQLite tables. The schema itself is
//! defined in migrations/20260801000000_init.sql. Decimal amounts are
//! stored as TEXT; conversion to the domain types parses them exactly.

use crate::error::{PersistenceError, PersistenceResult};
use chrono::{DateTime, Utc};
use minibank_core::{
    Account, AccountStatus, AccountType, Bill, BillStatus, Card, CardStatus, CardType, Loan,
    LoanStatus, Transaction, TransactionStatus, User,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Row type for the `users` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row type for the `accounts` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AccountRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[sqlx(rename = "type")]
    pub account_type: String,
    /// NULL reads as a zero balance
    pub balance: Option<String>,
    pub card_number: String,
    pub apy: f64,
    pub fees: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl AccountRow {
    /// Stored balance, treating NULL or unparsable text as zero
    pub fn balance(&self) -> Decimal {
        self.balance
            .as_deref()
            .and_then(|s| Decimal::from_str(s).ok())
            .unwrap_or(Decimal::ZERO)
    }
}

/// Row type for the `cards` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CardRow {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    #[sqlx(rename = "type")]
    pub card_type: String,
    pub number: String,
    pub holder: String,
    pub expiry: String,
    pub status: String,
    pub card_limit: String,
    pub created_at: DateTime<Utc>,
}

/// Row type for the `transactions` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TransactionRow {
    pub id: String,
    pub user_id: String,
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub amount: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Row type for the `bills` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct BillRow {
    pub id: String,
    pub user_id: String,
    pub biller_name: String,
    pub amount: String,
    pub due_date: DateTime<Utc>,
    pub category: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Row type for the `loans` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct LoanRow {
    pub id: String,
    pub user_id: String,
    pub loan_type: String,
    pub principal_amount: String,
    pub remaining_amount: String,
    pub interest_rate: f64,
    pub monthly_payment: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

// === Conversion implementations ===

fn parse_decimal(field: &str, value: &str) -> PersistenceResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|_| PersistenceError::InvalidDecimal(format!("{field}: {value}")))
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            password: user.password.clone(),
            phone: user.phone.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            password: row.password,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

impl From<&Account> for AccountRow {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            user_id: account.user_id.clone(),
            name: account.name.clone(),
            account_type: account.account_type.as_str().to_string(),
            balance: Some(account.balance.to_string()),
            card_number: account.card_number.clone(),
            apy: account.apy,
            fees: account.fees,
            status: account.status.as_str().to_string(),
            created_at: account.created_at,
        }
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = PersistenceError;

    fn try_from(row: AccountRow) -> PersistenceResult<Self> {
        let balance = row.balance();
        Ok(Self {
            account_type: AccountType::from_str(&row.account_type)
                .ok_or_else(|| PersistenceError::invalid_enum("account type", &row.account_type))?,
            status: AccountStatus::from_str(&row.status)
                .ok_or_else(|| PersistenceError::invalid_enum("account status", &row.status))?,
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            balance,
            card_number: row.card_number,
            apy: row.apy,
            fees: row.fees,
            created_at: row.created_at,
        })
    }
}

impl From<&Card> for CardRow {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id.clone(),
            user_id: card.user_id.clone(),
            account_id: card.account_id.clone(),
            card_type: card.card_type.as_str().to_string(),
            number: card.number.clone(),
            holder: card.holder.clone(),
            expiry: card.expiry.clone(),
            status: card.status.as_str().to_string(),
            card_limit: card.limit.to_string(),
            created_at: card.created_at,
        }
    }
}

impl TryFrom<CardRow> for Card {
    type Error = PersistenceError;

    fn try_from(row: CardRow) -> PersistenceResult<Self> {
        Ok(Self {
            card_type: CardType::from_str(&row.card_type)
                .ok_or_else(|| PersistenceError::invalid_enum("card type", &row.card_type))?,
            status: CardStatus::from_str(&row.status)
                .ok_or_else(|| PersistenceError::invalid_enum("card status", &row.status))?,
            limit: parse_decimal("card limit", &row.card_limit)?,
            id: row.id,
            user_id: row.user_id,
            account_id: row.account_id,
            number: row.number,
            holder: row.holder,
            expiry: row.expiry,
            created_at: row.created_at,
        })
    }
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.clone(),
            user_id: tx.user_id.clone(),
            from_account_id: tx.from_account_id.clone(),
            to_account_id: tx.to_account_id.clone(),
            amount: tx.amount.to_string(),
            description: tx.description.clone(),
            status: tx.status.as_str().to_string(),
            created_at: tx.created_at,
        }
    }
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = PersistenceError;

    fn try_from(row: TransactionRow) -> PersistenceResult<Self> {
        Ok(Self {
            amount: parse_decimal("transaction amount", &row.amount)?,
            status: TransactionStatus::from_str(&row.status)
                .ok_or_else(|| PersistenceError::invalid_enum("transaction status", &row.status))?,
            id: row.id,
            user_id: row.user_id,
            from_account_id: row.from_account_id,
            to_account_id: row.to_account_id,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

impl From<&Bill> for BillRow {
    fn from(bill: &Bill) -> Self {
        Self {
            id: bill.id.clone(),
            user_id: bill.user_id.clone(),
            biller_name: bill.biller_name.clone(),
            amount: bill.amount.to_string(),
            due_date: bill.due_date,
            category: bill.category.clone(),
            status: bill.status.as_str().to_string(),
            created_at: bill.created_at,
        }
    }
}

impl TryFrom<BillRow> for Bill {
    type Error = PersistenceError;

    fn try_from(row: BillRow) -> PersistenceResult<Self> {
        Ok(Self {
            amount: parse_decimal("bill amount", &row.amount)?,
            status: BillStatus::from_str(&row.status)
                .ok_or_else(|| PersistenceError::invalid_enum("bill status", &row.status))?,
            id: row.id,
            user_id: row.user_id,
            biller_name: row.biller_name,
            due_date: row.due_date,
            category: row.category,
            created_at: row.created_at,
        })
    }
}

impl From<&Loan> for LoanRow {
    fn from(loan: &Loan) -> Self {
        Self {
            id: loan.id.clone(),
            user_id: loan.user_id.clone(),
            loan_type: loan.loan_type.clone(),
            principal_amount: loan.principal_amount.to_string(),
            remaining_amount: loan.remaining_amount.to_string(),
            interest_rate: loan.interest_rate,
            monthly_payment: loan.monthly_payment.to_string(),
            start_date: loan.start_date,
            end_date: loan.end_date,
            status: loan.status.as_str().to_string(),
            created_at: loan.created_at,
        }
    }
}

impl TryFrom<LoanRow> for Loan {
    type Error = PersistenceError;

    fn try_from(row: LoanRow) -> PersistenceResult<Self> {
        Ok(Self {
            principal_amount: parse_decimal("loan principal", &row.principal_amount)?,
            remaining_amount: parse_decimal("loan remaining", &row.remaining_amount)?,
            monthly_payment: parse_decimal("loan payment", &row.monthly_payment)?,
            status: LoanStatus::from_str(&row.status)
                .ok_or_else(|| PersistenceError::invalid_enum("loan status", &row.status))?,
            id: row.id,
            user_id: row.user_id,
            loan_type: row.loan_type,
            interest_rate: row.interest_rate,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
        })
    }
}
