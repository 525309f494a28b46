//! Per-account mutual exclusion
//!
//! One async mutex per account id, created on demand. The processor holds
//! the lock across its whole read-validate-write-append sequence, so
//! operations on the same account serialize; operations on different
//! accounts run concurrently. Acquisition waits at most the configured
//! duration before failing with `Busy`.
//!
//! The registry grows with the set of accounts ever touched and entries
//! are not evicted; the bound is the accounts table.

use crate::error::{LedgerError, LedgerResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::timeout;

/// Held for the duration of one serialized account operation
pub type AccountGuard = OwnedMutexGuard<()>;

/// Registry of per-account locks
#[derive(Clone, Default)]
pub struct AccountLocks {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, account_id: &str) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().await;
        map.entry(account_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Acquire the lock for one account, waiting at most `wait`
    pub async fn acquire(&self, account_id: &str, wait: Duration) -> LedgerResult<AccountGuard> {
        let lock = self.entry(account_id).await;
        timeout(wait, lock.lock_owned())
            .await
            .map_err(|_| LedgerError::Busy {
                account_id: account_id.to_string(),
            })
    }

    /// Acquire locks for two accounts in lexicographic order, so two
    /// transfers crossing each other cannot deadlock. Passing the same id
    /// twice takes the lock once.
    pub async fn acquire_pair(
        &self,
        first: &str,
        second: &str,
        wait: Duration,
    ) -> LedgerResult<Vec<AccountGuard>> {
        if first == second {
            return Ok(vec![self.acquire(first, wait).await?]);
        }
        let (lo, hi) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        let mut guards = Vec::with_capacity(2);
        guards.push(self.acquire(lo, wait).await?);
        guards.push(self.acquire(hi, wait).await?);
        Ok(guards)
    }
}
