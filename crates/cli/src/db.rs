//! Database initialization and status

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::Path;

fn db_url(db_path: &Path) -> String {
    format!("sqlite:{}?mode=rwc", db_path.display())
}

/// Connect to the database, creating the file and schema if needed
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    minibank_persistence::init_database(&db_url(db_path))
        .await
        .context("Failed to open database")
}

/// Initialize the database with schema
pub async fn init_database(db_path: &Path, force: bool) -> Result<()> {
    if force && db_path.exists() {
        std::fs::remove_file(db_path).context("Failed to remove existing database")?;
        println!("🗑️  Removed existing database");
    }

    let pool = connect(db_path).await?;
    pool.close().await;
    Ok(())
}

/// Show database status
pub async fn show_status(db_path: &Path) -> Result<()> {
    if !db_path.exists() {
        println!("❌ Database not found at {:?}", db_path);
        println!("   Run 'minibank init' to create the database");
        return Ok(());
    }

    let pool = connect(db_path).await?;

    println!("📊 Database Status");
    println!("   Path: {:?}", db_path);
    println!();

    for table in ["users", "accounts", "cards", "transactions", "bills", "loans"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or((0,));
        println!("   {:<14} {}", table, count.0);
    }

    pool.close().await;
    Ok(())
}
