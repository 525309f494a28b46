//! Loan commands

use crate::{commands, db, AuthArgs};
use anyhow::Result;
use minibank_ledger::{LoanService, ServiceContext};
use rust_decimal::Decimal;
use std::path::Path;

/// Apply for a loan
pub async fn apply(
    db_path: &Path,
    auth: &AuthArgs,
    loan_type: &str,
    principal: Decimal,
    tenure: Option<u32>,
) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let identity = commands::authenticate(&pool, auth).await?;
    let ctx = ServiceContext::new(pool.clone());

    let receipt = LoanService::new(&ctx)
        .apply(&identity.user_id, loan_type, principal, tenure)
        .await?;

    println!("✅ Loan application approved");
    println!("   Loan ID:         {}", receipt.loan_id);
    println!("   Interest rate:   {}%", receipt.interest_rate);
    println!("   Monthly payment: {}", receipt.monthly_payment);

    pool.close().await;
    Ok(())
}

/// List the caller's loans
pub async fn list(db_path: &Path, auth: &AuthArgs) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let identity = commands::authenticate(&pool, auth).await?;
    let ctx = ServiceContext::new(pool.clone());

    let loans = LoanService::new(&ctx).list(&identity.user_id).await?;
    println!("🏦 {} loan(s)", loans.len());
    for loan in loans {
        println!(
            "   {}  {:<10} principal {:>12}  {}%  monthly {:>10}  {} -> {}",
            loan.id,
            loan.loan_type,
            loan.principal_amount,
            loan.interest_rate,
            loan.monthly_payment,
            loan.start_date.format("%Y-%m-%d"),
            loan.end_date.format("%Y-%m-%d")
        );
    }

    pool.close().await;
    Ok(())
}
