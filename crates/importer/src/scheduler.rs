//! Periodic refresh driver.
//!
//! One actor task owns the timer and the trigger mailbox, so refreshes never
//! overlap: a trigger that arrives during a run is held in the capacity-one
//! mailbox and becomes exactly one follow-up run, further triggers are
//! coalesced into it.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use storage::Store;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::results::{ResultsSynchronizer, SyncReport};
use crate::traits::StandingsProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    pub interval: Duration,
    /// Wall-clock bound on a single run.
    pub run_timeout: Duration,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2 * 60 * 60),
            run_timeout: Duration::from_secs(30 * 60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Idle,
    Running,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulerStatus {
    pub state: RunState,
    /// Runs that have ended, successfully or not.
    pub completed_runs: u64,
    pub last_report: Option<SyncReport>,
    pub last_error: Option<String>,
}

impl Default for SchedulerStatus {
    fn default() -> Self {
        Self {
            state: RunState::Idle,
            completed_runs: 0,
            last_report: None,
            last_error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A run will start once the current one, if any, has finished.
    Queued,
    /// A follow-up run was already pending; this trigger joined it.
    Coalesced,
    /// The scheduler has shut down.
    Stopped,
}

/// Cloneable handle for requesting refreshes and observing the scheduler.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    triggers: mpsc::Sender<()>,
    status: watch::Receiver<SchedulerStatus>,
}

impl RefreshHandle {
    pub fn trigger(&self) -> TriggerOutcome {
        match self.triggers.try_send(()) {
            Ok(()) => TriggerOutcome::Queued,
            Err(mpsc::error::TrySendError::Full(())) => TriggerOutcome::Coalesced,
            Err(mpsc::error::TrySendError::Closed(())) => TriggerOutcome::Stopped,
        }
    }

    pub fn status(&self) -> SchedulerStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SchedulerStatus> {
        self.status.clone()
    }
}

pub struct RefreshScheduler<S: ?Sized, P: ?Sized> {
    sync: Arc<ResultsSynchronizer<S, P>>,
    settings: SchedulerSettings,
    triggers: mpsc::Receiver<()>,
    status: watch::Sender<SchedulerStatus>,
    shutdown: CancellationToken,
}

impl<S, P> RefreshScheduler<S, P>
where
    S: Store + ?Sized + 'static,
    P: StandingsProvider + ?Sized + 'static,
{
    /// Start the scheduler task. The first run begins immediately.
    pub fn spawn(
        sync: Arc<ResultsSynchronizer<S, P>>,
        settings: SchedulerSettings,
        shutdown: CancellationToken,
    ) -> (RefreshHandle, JoinHandle<()>) {
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        let (status_tx, status_rx) = watch::channel(SchedulerStatus::default());

        let scheduler = Self {
            sync,
            settings,
            triggers: trigger_rx,
            status: status_tx,
            shutdown,
        };
        let task = tokio::spawn(scheduler.run());

        let handle = RefreshHandle {
            triggers: trigger_tx,
            status: status_rx,
        };
        (handle, task)
    }

    async fn run(mut self) {
        // `interval` panics on a zero period.
        let mut ticker = interval(self.settings.interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            interval_secs = self.settings.interval.as_secs(),
            run_timeout_secs = self.settings.run_timeout.as_secs(),
            "Refresh scheduler started"
        );

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                _ = ticker.tick() => self.refresh("interval").await,
                Some(()) = self.triggers.recv() => self.refresh("manual").await,
            }
        }

        info!("Refresh scheduler stopped");
    }

    async fn refresh(&self, reason: &'static str) {
        self.status.send_modify(|status| status.state = RunState::Running);
        info!(reason, "Refresh started");

        let outcome = tokio::select! {
            _ = self.shutdown.cancelled() => {
                warn!(reason, "Refresh interrupted by shutdown");
                self.status.send_modify(|status| status.state = RunState::Idle);
                return;
            }
            outcome = tokio::time::timeout(self.settings.run_timeout, self.sync.sync_all()) => outcome,
        };

        self.status.send_modify(|status| {
            status.state = RunState::Idle;
            status.completed_runs += 1;
            match outcome {
                Ok(Ok(report)) => {
                    status.last_report = Some(report);
                    status.last_error = None;
                }
                Ok(Err(e)) => {
                    error!(reason, error = %e, "Refresh failed");
                    status.last_error = Some(e.to_string());
                }
                Err(_) => {
                    error!(
                        reason,
                        timeout_secs = self.settings.run_timeout.as_secs(),
                        "Refresh exceeded run timeout"
                    );
                    status.last_error = Some(format!(
                        "run exceeded {:?}",
                        self.settings.run_timeout
                    ));
                }
            }
        });
    }
}
