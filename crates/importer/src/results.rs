use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use storage::{RunLease, Store};
use storage::dto::result::ResultUpsert;
use storage::models::{Contest, DivisionTier, User};
use storage::services::scoring::compute_points;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::error::{ImporterError, Result};
use crate::matcher::find_rank;
use crate::models::Standings;
use crate::retry::{RetryPolicy, retry_transient};
use crate::traits::StandingsProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    /// Standings fetches allowed in flight at once.
    pub concurrency: usize,
    /// Bound on a single standings request.
    pub fetch_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            concurrency: 4,
            fetch_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

/// Outcome of one full synchronization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub contests_total: usize,
    pub contests_synced: usize,
    pub contests_skipped: usize,
    pub results_written: usize,
    pub results_failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    fn start(contests_total: usize) -> Self {
        let now = Utc::now();
        Self {
            contests_total,
            contests_synced: 0,
            contests_skipped: 0,
            results_written: 0,
            results_failed: 0,
            started_at: now,
            finished_at: now,
        }
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// How long [`sync_all`](ResultsSynchronizer::sync_all) sleeps between
/// attempts to take a run lock held by another synchronizer.
const LEASE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Ranks of the roster in one contest, in roster order.
struct ContestOutcome {
    division: DivisionTier,
    participants: usize,
    ranks: Vec<i32>,
}

impl ContestOutcome {
    fn score(standings: &Standings, users: &[User]) -> Self {
        Self {
            // The standings payload carries the authoritative contest title.
            division: DivisionTier::classify(&standings.contest_name),
            participants: standings.participant_count(),
            ranks: users
                .iter()
                .map(|user| find_rank(standings, &user.handle))
                .collect(),
        }
    }
}

/// Recomputes every (user, contest) result from fresh standings.
///
/// Runs are exclusive across every synchronizer sharing the store:
/// [`sync_all`](Self::sync_all) waits for an in-flight run to finish,
/// [`try_sync_all`](Self::try_sync_all) gives up instead.
pub struct ResultsSynchronizer<S: ?Sized, P: ?Sized> {
    store: Arc<S>,
    provider: Arc<P>,
    settings: SyncSettings,
    run_lock: Mutex<()>,
}

impl<S, P> ResultsSynchronizer<S, P>
where
    S: Store + ?Sized,
    P: StandingsProvider + ?Sized,
{
    pub fn new(store: Arc<S>, provider: Arc<P>, settings: SyncSettings) -> Self {
        Self {
            store,
            provider,
            settings,
            run_lock: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Run a full synchronization once any in-flight run has completed.
    ///
    /// Individual contests that cannot be fetched are skipped and individual
    /// writes that fail are counted. Only failing to read the roster or the
    /// tracked contests, or to reach the run lock, is an error.
    pub async fn sync_all(&self) -> Result<SyncReport> {
        let _local = self.run_lock.lock().await;
        let _lease = self.wait_for_lease().await?;
        self.run().await
    }

    /// Like [`sync_all`](Self::sync_all) but returns `None` when a run is
    /// already in flight.
    pub async fn try_sync_all(&self) -> Result<Option<SyncReport>> {
        let Ok(_local) = self.run_lock.try_lock() else {
            debug!("Synchronization already running, request dropped");
            return Ok(None);
        };
        let Some(_lease) = self.store.try_lock_run().await? else {
            debug!("Synchronization running elsewhere, request dropped");
            return Ok(None);
        };
        self.run().await.map(Some)
    }

    async fn wait_for_lease(&self) -> Result<RunLease> {
        let mut announced = false;
        loop {
            if let Some(lease) = self.store.try_lock_run().await? {
                return Ok(lease);
            }
            if !announced {
                info!("Another synchronization is running, waiting for it to finish");
                announced = true;
            }
            tokio::time::sleep(LEASE_POLL_INTERVAL).await;
        }
    }

    async fn run(&self) -> Result<SyncReport> {
        let users = self.store.list_users().await?;
        let contests = self.store.list_contests().await?;
        let mut report = SyncReport::start(contests.len());

        info!(
            provider = self.provider.name(),
            users = users.len(),
            contests = contests.len(),
            "Starting results synchronization"
        );

        // Every fetch finishes before the first write: a fetch left unpolled
        // while writes are pending would keep burning its timeout.
        let roster = users.as_slice();
        let fetched: Vec<(Contest, Result<ContestOutcome>)> = stream::iter(contests)
            .map(|contest| {
                let fetch = self.fetch(contest.external_id);
                async move {
                    let outcome = fetch
                        .await
                        .map(|standings| ContestOutcome::score(&standings, roster));
                    (contest, outcome)
                }
            })
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await;

        for (contest, outcome) in fetched {
            match outcome {
                Ok(outcome) => {
                    self.apply(&contest, &outcome, &users, &mut report).await;
                    report.contests_synced += 1;
                }
                Err(e) => {
                    warn!(
                        external_id = contest.external_id,
                        contest = %contest.name,
                        error = %e,
                        "Skipping contest, standings unavailable"
                    );
                    report.contests_skipped += 1;
                }
            }
        }

        report.finished_at = Utc::now();

        if let Err(e) = self.store.record_refresh(report.finished_at.naive_utc()).await {
            warn!(error = %e, "Failed to record refresh time");
        }

        info!(
            synced = report.contests_synced,
            skipped = report.contests_skipped,
            written = report.results_written,
            failed = report.results_failed,
            elapsed_ms = report.elapsed().num_milliseconds(),
            "Results synchronization finished"
        );

        Ok(report)
    }

    /// Standings for one contest, retried while failures look transient.
    /// Each attempt is bounded by the fetch timeout.
    async fn fetch(&self, external_id: i32) -> Result<Standings> {
        let timeout = self.settings.fetch_timeout;
        retry_transient("contest.standings", self.settings.retry, || async move {
            tokio::time::timeout(timeout, self.provider.fetch_standings(external_id))
                .await
                .map_err(|_| ImporterError::Timeout(timeout))?
        })
        .await
    }

    async fn apply(
        &self,
        contest: &Contest,
        outcome: &ContestOutcome,
        users: &[User],
        report: &mut SyncReport,
    ) {
        let now = Utc::now().naive_utc();

        debug!(
            external_id = contest.external_id,
            division = %outcome.division,
            participants = outcome.participants,
            "Scoring contest"
        );

        for (user, &rank) in users.iter().zip(&outcome.ranks) {
            let upsert = ResultUpsert {
                user_id: user.user_id,
                contest_id: contest.contest_id,
                rank,
                points: compute_points(rank, outcome.participants, outcome.division),
                last_updated: now,
            };

            match self.store.upsert_result(&upsert).await {
                Ok(_) => report.results_written += 1,
                Err(e) => {
                    error!(
                        handle = %user.handle,
                        external_id = contest.external_id,
                        error = %e,
                        "Failed to store result"
                    );
                    report.results_failed += 1;
                }
            }
        }
    }
}
