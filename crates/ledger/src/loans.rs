//! Loan origination service
//!
//! Wraps the pure calculator in `minibank_core::loan` and writes the loan
//! record. No balance is touched and no credit check is performed; every
//! application with a positive principal is approved.

use crate::error::{LedgerError, LedgerResult};
use crate::services::{LoanReceipt, ServiceContext};
use chrono::Utc;
use minibank_core::{loan, Loan, LoanStatus, DEFAULT_TENURE_MONTHS};
use minibank_persistence::{LoanRepo, LoanRow};
use rust_decimal::Decimal;
use tracing::info;

/// Originates and lists loans
pub struct LoanService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LoanService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply for a loan; tenure defaults to 60 months
    pub async fn apply(
        &self,
        user_id: &str,
        loan_type: &str,
        principal: Decimal,
        tenure_months: Option<u32>,
    ) -> LedgerResult<LoanReceipt> {
        let tenure = tenure_months.unwrap_or(DEFAULT_TENURE_MONTHS);
        let terms = loan::originate(loan_type, principal, tenure)?;

        let record = Loan {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            loan_type: loan_type.to_string(),
            principal_amount: principal,
            remaining_amount: terms.remaining_amount,
            interest_rate: terms.interest_rate,
            monthly_payment: terms.monthly_payment,
            start_date: terms.start_date,
            end_date: terms.end_date,
            status: LoanStatus::Active,
            created_at: Utc::now(),
        };
        LoanRepo::insert(self.ctx.pool(), &LoanRow::from(&record)).await?;

        info!(
            user = %user_id,
            loan = %record.id,
            %principal,
            payment = %terms.monthly_payment,
            "loan originated"
        );
        Ok(LoanReceipt {
            loan_id: record.id,
            interest_rate: terms.interest_rate,
            monthly_payment: terms.monthly_payment,
        })
    }

    /// A user's loans, newest first
    pub async fn list(&self, user_id: &str) -> LedgerResult<Vec<Loan>> {
        let rows = LoanRepo::get_by_user(self.ctx.pool(), user_id).await?;
        rows.into_iter()
            .map(|row| Loan::try_from(row).map_err(LedgerError::from))
            .collect()
    }
}
