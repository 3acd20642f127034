use sqlx::PgPool;

use crate::error::Result;
use crate::lock::RunLease;

/// Advisory lock key shared by every process synchronizing results.
const RESULTS_SYNC_LOCK_KEY: i64 = 0x6366_5f73_796e_63;

/// Repository for the results synchronization lock
pub struct RunLockRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RunLockRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Take the lock inside a transaction kept open by the lease, or return
    /// `None` when another session holds it.
    pub async fn try_acquire(&self) -> Result<Option<RunLease>> {
        let mut tx = self.pool.begin().await?;

        let acquired: bool = sqlx::query_scalar("SELECT pg_try_advisory_xact_lock($1)")
            .bind(RESULTS_SYNC_LOCK_KEY)
            .fetch_one(&mut *tx)
            .await?;

        if !acquired {
            tx.rollback().await?;
            return Ok(None);
        }

        Ok(Some(RunLease::postgres(tx)))
    }
}
