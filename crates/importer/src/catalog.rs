use std::sync::Arc;

use storage::ContestStore;
use tracing::{debug, info};

use crate::error::Result;
use crate::retry::{RetryPolicy, retry_transient};
use crate::traits::StandingsProvider;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogSyncReport {
    /// Entries returned by the provider.
    pub listed: usize,
    /// Entries that passed the finished/standard filter.
    pub eligible: usize,
    /// Eligible entries that were not tracked yet.
    pub inserted: usize,
}

/// Pulls the provider's contest catalog into the tracked set.
pub struct ContestCatalogSync<S: ?Sized, P: ?Sized> {
    store: Arc<S>,
    provider: Arc<P>,
    scope: Option<String>,
    retry: RetryPolicy,
}

impl<S, P> ContestCatalogSync<S, P>
where
    S: ContestStore + ?Sized,
    P: StandingsProvider + ?Sized,
{
    pub fn new(store: Arc<S>, provider: Arc<P>, scope: Option<String>) -> Self {
        Self {
            store,
            provider,
            scope,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Insert every finished standard contest that is not tracked yet.
    ///
    /// Already tracked contests are left untouched. Any provider or store error
    /// aborts the call; inserts committed before the failure are kept.
    pub async fn sync(&self) -> Result<CatalogSyncReport> {
        let scope = self.scope.as_deref();
        let catalog = retry_transient("contest.list", self.retry, || {
            self.provider.list_contests(scope)
        })
        .await?;

        let mut report = CatalogSyncReport {
            listed: catalog.len(),
            ..CatalogSyncReport::default()
        };

        for summary in catalog.iter().filter(|c| c.is_trackable()) {
            report.eligible += 1;
            if self
                .store
                .insert_contest_if_absent(&summary.to_new_contest())
                .await?
            {
                debug!(external_id = summary.external_id, name = %summary.name, "Tracking new contest");
                report.inserted += 1;
            }
        }

        info!(
            provider = self.provider.name(),
            scope = scope.unwrap_or("public"),
            listed = report.listed,
            eligible = report.eligible,
            inserted = report.inserted,
            "Contest catalog synchronized"
        );

        Ok(report)
    }
}
