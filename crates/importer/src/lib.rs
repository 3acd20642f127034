pub mod catalog;
pub mod error;
pub mod matcher;
pub mod models;
pub mod results;
pub mod retry;
pub mod roster;
pub mod scheduler;
pub mod sources;
pub mod traits;

#[cfg(test)]
mod testing;

pub use catalog::{CatalogSyncReport, ContestCatalogSync};
pub use error::{ImporterError, Result};
pub use models::{ContestSummary, Standings, StandingsRow};
pub use results::{ResultsSynchronizer, SyncReport, SyncSettings};
pub use retry::RetryPolicy;
pub use roster::register_user;
pub use scheduler::{
    RefreshHandle, RefreshScheduler, RunState, SchedulerSettings, SchedulerStatus, TriggerOutcome,
};
pub use traits::StandingsProvider;

// Re-export Codeforces types
pub use sources::codeforces::{CodeforcesClient, DEFAULT_BASE_URL as CODEFORCES_API_URL};
