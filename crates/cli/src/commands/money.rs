//! Money movement commands: deposit, transfer, bills, transactions

use crate::{commands, db, AuthArgs};
use anyhow::Result;
use minibank_ledger::{ProcessorConfig, ServiceContext, TransactionProcessor};
use minibank_persistence::{BillRepo, TransactionRepo};
use rust_decimal::Decimal;
use std::path::Path;

/// Deposit into the caller's account of the given type
pub async fn deposit(
    db_path: &Path,
    config: ProcessorConfig,
    auth: &AuthArgs,
    account_type: &str,
    amount: Decimal,
) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let identity = commands::authenticate(&pool, auth).await?;
    let ctx = ServiceContext::with_config(pool.clone(), config);

    let receipt = TransactionProcessor::new(&ctx)
        .deposit(&identity.user_id, account_type, amount)
        .await?;

    println!("✅ Deposit successful!");
    println!("   Transaction: {}", receipt.transaction_id);
    println!("   Account:     {}", receipt.account_id);
    println!("   New balance: {}", receipt.new_balance);

    pool.close().await;
    Ok(())
}

/// Transfer out of an account
pub async fn transfer(
    db_path: &Path,
    config: ProcessorConfig,
    auth: &AuthArgs,
    from_account_id: &str,
    to_account_id: Option<&str>,
    amount: Decimal,
    description: &str,
) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let identity = commands::authenticate(&pool, auth).await?;
    let ctx = ServiceContext::with_config(pool.clone(), config);

    let receipt = TransactionProcessor::new(&ctx)
        .transfer(
            &identity.user_id,
            from_account_id,
            to_account_id,
            amount,
            description,
        )
        .await?;

    println!("✅ Transfer successful!");
    println!("   Transaction: {}", receipt.transaction_id);
    println!("   New balance: {}", receipt.new_balance);

    pool.close().await;
    Ok(())
}

/// List the caller's bills
pub async fn bills(db_path: &Path, auth: &AuthArgs) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let identity = commands::authenticate(&pool, auth).await?;

    let bills = BillRepo::get_by_user(&pool, &identity.user_id).await?;
    println!("🧾 {} bill(s)", bills.len());
    for bill in bills {
        println!(
            "   {}  {:<8} {:>12}  due {}  {}",
            bill.id,
            bill.status,
            bill.amount,
            bill.due_date.format("%Y-%m-%d"),
            bill.biller_name
        );
    }

    pool.close().await;
    Ok(())
}

/// Pay a bill from an account
pub async fn pay_bill(
    db_path: &Path,
    config: ProcessorConfig,
    auth: &AuthArgs,
    bill_id: &str,
    account_id: &str,
    amount: Decimal,
) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let identity = commands::authenticate(&pool, auth).await?;
    let ctx = ServiceContext::with_config(pool.clone(), config);

    let receipt = TransactionProcessor::new(&ctx)
        .pay_bill(&identity.user_id, bill_id, account_id, amount)
        .await?;

    println!("✅ Bill paid successfully!");
    println!("   Transaction: {}", receipt.transaction_id);
    println!("   Bill:        {}", receipt.bill_id);
    println!("   New balance: {}", receipt.new_balance);

    pool.close().await;
    Ok(())
}

/// List the caller's recent transactions
pub async fn transactions(db_path: &Path, auth: &AuthArgs) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let identity = commands::authenticate(&pool, auth).await?;

    let rows = TransactionRepo::get_by_user(&pool, &identity.user_id).await?;
    println!("📜 {} transaction(s), newest first", rows.len());
    for row in rows {
        println!(
            "   {}  {:>14}  {}  {}",
            row.created_at.format("%Y-%m-%d %H:%M:%S"),
            row.amount,
            row.status,
            row.description
        );
    }

    pool.close().await;
    Ok(())
}
