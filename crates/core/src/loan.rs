//! # Loan Module
//!
//! Loan records and the origination calculator: a fixed rate table keyed by
//! loan type and the standard amortization formula for the monthly payment.
//! There is no repayment operation; a loan is written once and never
//! mutated.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default tenure when the applicant does not specify one
pub const DEFAULT_TENURE_MONTHS: u32 = 60;

/// Loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(LoanStatus::Active),
            _ => None,
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A loan record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub user_id: String,
    pub loan_type: String,
    pub principal_amount: Decimal,
    pub remaining_amount: Decimal,
    /// Annual rate in percent
    pub interest_rate: f64,
    pub monthly_payment: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
}

/// Annual interest rate (percent) for a loan type; unknown types get 10.0
pub fn interest_rate_for(loan_type: &str) -> f64 {
    match loan_type {
        "home" => 8.5,
        "personal" => 12.0,
        "auto" => 7.5,
        "education" => 6.5,
        _ => 10.0,
    }
}

/// Everything derived at origination time
#[derive(Debug, Clone, PartialEq)]
pub struct LoanTerms {
    /// Annual rate in percent, from the type table
    pub interest_rate: f64,
    /// Fixed monthly payment, rounded to 2 decimal places
    pub monthly_payment: Decimal,
    /// Principal x 0.8: an approximation of first-payment-applied principal
    pub remaining_amount: Decimal,
    pub tenure_months: u32,
    pub start_date: DateTime<Utc>,
    /// Calendar-naive: start + 30-day months
    pub end_date: DateTime<Utc>,
}

/// Derive loan terms from type, principal and tenure.
///
/// monthly_rate = rate / 100 / 12
/// payment      = p * r * (1+r)^n / ((1+r)^n - 1), or p / n at zero rate
///
/// The power series runs in f64 (rates are not balances); the result is
/// carried back into `Decimal` and rounded to cents.
pub fn originate(loan_type: &str, principal: Decimal, tenure_months: u32) -> CoreResult<LoanTerms> {
    if principal <= Decimal::ZERO {
        return Err(CoreError::InvalidAmount(format!(
            "Loan principal must be positive: {}",
            principal
        )));
    }
    if tenure_months == 0 {
        return Err(CoreError::InvalidTenure { months: 0 });
    }

    let interest_rate = interest_rate_for(loan_type);
    let monthly_rate = interest_rate / 100.0 / 12.0;

    let principal_f = principal
        .to_f64()
        .ok_or_else(|| CoreError::InvalidAmount(format!("Principal out of range: {}", principal)))?;

    let payment = if monthly_rate > 0.0 {
        let growth = (1.0 + monthly_rate).powi(tenure_months as i32);
        principal_f * monthly_rate * growth / (growth - 1.0)
    } else {
        principal_f / tenure_months as f64
    };

    let monthly_payment = Decimal::from_f64(payment)
        .ok_or_else(|| CoreError::InvalidAmount(format!("Payment out of range: {}", payment)))?
        .round_dp(2);

    let start_date = Utc::now();
    let remaining_amount = (principal * Decimal::new(8, 1)).round_dp(2);

    Ok(LoanTerms {
        interest_rate,
        monthly_payment,
        remaining_amount,
        tenure_months,
        start_date,
        end_date: start_date + Duration::days(i64::from(tenure_months) * 30),
    })
}
