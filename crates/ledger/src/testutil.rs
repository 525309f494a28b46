//! Shared fixtures for the unit tests: a throwaway database plus a
//! freshly registered user.

use crate::onboarding::RegistrationService;
use crate::services::{ProcessorConfig, RegisteredUser, ServiceContext};
use minibank_persistence::init_database;
use tempfile::TempDir;

pub(crate) async fn setup_empty() -> (TempDir, ServiceContext) {
    setup_empty_with_config(ProcessorConfig::default()).await
}

pub(crate) async fn setup_empty_with_config(config: ProcessorConfig) -> (TempDir, ServiceContext) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("minibank.db").display());
    let pool = init_database(&url).await.unwrap();
    (dir, ServiceContext::with_config(pool, config))
}

pub(crate) async fn setup() -> (TempDir, ServiceContext, RegisteredUser) {
    setup_with_config(ProcessorConfig::default()).await
}

pub(crate) async fn setup_with_config(
    config: ProcessorConfig,
) -> (TempDir, ServiceContext, RegisteredUser) {
    let (dir, ctx) = setup_empty_with_config(config).await;
    let reg = RegistrationService::new(&ctx)
        .register("Alice", "alice@example.com", "secret123")
        .await
        .unwrap();
    (dir, ctx, reg)
}
