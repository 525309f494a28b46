//! # Bill Module
//!
//! A payable obligation. Bills transition `pending -> paid` exactly once,
//! atomically with the paying transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bill status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Paid,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Paid => "paid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(BillStatus::Pending),
            "paid" => Some(BillStatus::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A payable obligation owned by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    pub user_id: String,
    pub biller_name: String,
    pub amount: Decimal,
    pub due_date: DateTime<Utc>,
    pub category: String,
    pub status: BillStatus,
    pub created_at: DateTime<Utc>,
}

impl Bill {
    pub fn is_pending(&self) -> bool {
        self.status == BillStatus::Pending
    }
}

/// The five obligations seeded for every new user: (biller, amount, category).
/// Amounts parse as exact decimals at seed time.
pub const DEFAULT_BILLS: [(&str, &str, &str); 5] = [
    ("Electric Bill", "14500.00", "utilities"),
    ("Internet Bill", "9999.00", "utilities"),
    ("Phone Bill", "7500.00", "utilities"),
    ("Insurance", "24000.00", "insurance"),
    ("Rent/Mortgage", "140000.00", "housing"),
];
