//! Shared setup for integration tests

use minibank_ledger::{ProcessorConfig, RegisteredUser, RegistrationService, ServiceContext};
use minibank_persistence::init_database;
use tempfile::TempDir;

pub async fn setup_empty() -> (TempDir, ServiceContext) {
    setup_empty_with_config(ProcessorConfig::default()).await
}

pub async fn setup_empty_with_config(config: ProcessorConfig) -> (TempDir, ServiceContext) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("minibank.db").display());
    let pool = init_database(&url).await.unwrap();
    (dir, ServiceContext::with_config(pool, config))
}

pub async fn setup() -> (TempDir, ServiceContext, RegisteredUser) {
    let (dir, ctx) = setup_empty().await;
    let reg = RegistrationService::new(&ctx)
        .register("Alice", "alice@example.com", "secret123")
        .await
        .unwrap();
    (dir, ctx, reg)
}
