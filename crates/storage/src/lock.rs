//! Exclusive right to run a results synchronization.
//!
//! The lease lives in the store so that every process sharing the same data
//! (a `serve` loop and a one-off `refresh`, say) contends for the same lock.

use std::fmt;

use sqlx::{Postgres, Transaction};
use tokio::sync::OwnedMutexGuard;

/// Held for the duration of a run; dropping it releases the lock.
pub struct RunLease {
    held: Held,
}

// Fields are only held for their drop.
#[allow(dead_code)]
enum Held {
    /// Transaction owning a `pg_advisory_xact_lock`. Rolled back on drop,
    /// which releases the lock.
    Postgres(Transaction<'static, Postgres>),
    Memory(OwnedMutexGuard<()>),
}

impl RunLease {
    pub(crate) fn postgres(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            held: Held::Postgres(tx),
        }
    }

    pub(crate) fn memory(guard: OwnedMutexGuard<()>) -> Self {
        Self {
            held: Held::Memory(guard),
        }
    }
}

impl fmt::Debug for RunLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backend = match self.held {
            Held::Postgres(_) => "postgres",
            Held::Memory(_) => "memory",
        };
        f.debug_struct("RunLease").field("backend", &backend).finish()
    }
}
