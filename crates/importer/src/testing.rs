//! Scripted provider and fault-injecting store for exercising the sync engine.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use storage::dto::contest::NewContest;
use storage::dto::result::ResultUpsert;
use storage::dto::user::{CreateUserRequest, UpdateUserRequest};
use storage::models::{Contest, ContestResult, RefreshLog, User};
use storage::{
    ContestStore, MemoryStore, RefreshLogStore, ResultStore, RunLease, RunLockStore,
    StorageError, UserStore,
};
use uuid::Uuid;

use crate::error::{ImporterError, Result};
use crate::models::{ContestSummary, Standings, StandingsRow};
use crate::traits::StandingsProvider;

#[derive(Debug, Clone, Copy)]
pub enum Failure {
    /// HTTP 503 on every call.
    Unavailable,
    /// FAILED envelope.
    Rejected,
    /// Body that is not JSON.
    Malformed,
    /// Never answers.
    Hang,
    /// HTTP 502 for the first `n` calls, then success.
    Flaky(usize),
}

#[derive(Default)]
pub struct FakeProvider {
    catalog: Mutex<Vec<ContestSummary>>,
    catalog_failure: Mutex<Option<Failure>>,
    standings: Mutex<HashMap<i32, Standings>>,
    failures: Mutex<HashMap<i32, Failure>>,
    known_handles: Mutex<HashSet<String>>,
    delay: Mutex<Duration>,
    contest_delays: Mutex<HashMap<i32, Duration>>,
    fetch_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(self, contests: Vec<ContestSummary>) -> Self {
        *self.catalog.lock().unwrap() = contests;
        self
    }

    pub fn with_catalog_failure(self, failure: Failure) -> Self {
        *self.catalog_failure.lock().unwrap() = Some(failure);
        self
    }

    pub fn with_standings(self, contest_id: i32, name: &str, rows: &[(i32, &str)]) -> Self {
        self.set_standings(contest_id, name, rows);
        self
    }

    pub fn with_failure(self, contest_id: i32, failure: Failure) -> Self {
        self.failures.lock().unwrap().insert(contest_id, failure);
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = delay;
        self
    }

    /// Overrides [`with_delay`](Self::with_delay) for one contest.
    pub fn with_contest_delay(self, contest_id: i32, delay: Duration) -> Self {
        self.contest_delays.lock().unwrap().insert(contest_id, delay);
        self
    }

    pub fn with_handles(self, handles: &[&str]) -> Self {
        self.known_handles
            .lock()
            .unwrap()
            .extend(handles.iter().map(|h| h.to_string()));
        self
    }

    /// Rows are `(rank, party)`; team members are comma separated.
    pub fn set_standings(&self, contest_id: i32, name: &str, rows: &[(i32, &str)]) {
        let standings = Standings {
            contest_name: name.to_string(),
            rows: rows
                .iter()
                .map(|(rank, party)| StandingsRow {
                    rank: *rank,
                    handles: party.split(',').map(str::to_string).collect(),
                })
                .collect(),
        };
        self.standings.lock().unwrap().insert(contest_id, standings);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn take_failure(&self, contest_id: i32) -> Option<Failure> {
        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(&contest_id) {
            Some(Failure::Flaky(remaining)) if *remaining == 0 => None,
            Some(Failure::Flaky(remaining)) => {
                *remaining -= 1;
                Some(Failure::Flaky(*remaining))
            }
            Some(failure) => Some(*failure),
            None => None,
        }
    }
}

pub fn summary(external_id: i32, name: &str, phase: &str, kind: &str) -> ContestSummary {
    ContestSummary {
        external_id,
        name: name.to_string(),
        start_time: 1_700_000_000 + i64::from(external_id),
        phase: phase.to_string(),
        kind: kind.to_string(),
    }
}

async fn fail(failure: Failure) -> ImporterError {
    match failure {
        Failure::Unavailable => ImporterError::HttpStatus(503),
        Failure::Flaky(_) => ImporterError::HttpStatus(502),
        Failure::Rejected => ImporterError::ApiError("contestId: Contest not found".to_string()),
        Failure::Malformed => ImporterError::ParseError(
            serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
        ),
        Failure::Hang => {
            std::future::pending::<()>().await;
            unreachable!()
        }
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StandingsProvider for FakeProvider {
    async fn list_contests(&self, _scope: Option<&str>) -> Result<Vec<ContestSummary>> {
        let failure = *self.catalog_failure.lock().unwrap();
        if let Some(failure) = failure {
            return Err(fail(failure).await);
        }
        Ok(self.catalog.lock().unwrap().clone())
    }

    async fn fetch_standings(&self, contest_id: i32) -> Result<Standings> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        // Two steps, like a response whose headers and body arrive apart.
        let delay = self
            .contest_delays
            .lock()
            .unwrap()
            .get(&contest_id)
            .copied()
            .unwrap_or(*self.delay.lock().unwrap());
        if !delay.is_zero() {
            tokio::time::sleep(delay / 2).await;
            tokio::time::sleep(delay - delay / 2).await;
        }

        if let Some(failure) = self.take_failure(contest_id) {
            return Err(fail(failure).await);
        }

        self.standings
            .lock()
            .unwrap()
            .get(&contest_id)
            .cloned()
            .ok_or_else(|| ImporterError::ApiError(format!("contestId: {contest_id} not found")))
    }

    async fn fetch_contest(&self, contest_id: i32) -> Result<ContestSummary> {
        let standings = self.fetch_standings(contest_id).await?;
        Ok(summary(contest_id, &standings.contest_name, "FINISHED", "CF"))
    }

    async fn lookup_user(&self, handle: &str) -> Result<bool> {
        Ok(self.known_handles.lock().unwrap().contains(handle))
    }

    fn name(&self) -> &'static str {
        "Fake"
    }
}

/// Wraps a [`MemoryStore`] and fails selected operations.
#[derive(Clone, Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    pub failing_user: Option<Uuid>,
    pub fail_roster: bool,
    /// Added to every result write.
    pub write_delay: Duration,
}

impl FaultyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }
}

fn injected() -> StorageError {
    StorageError::ConstraintViolation("injected failure".to_string())
}

#[async_trait]
impl UserStore for FaultyStore {
    async fn list_users(&self) -> storage::Result<Vec<User>> {
        if self.fail_roster {
            return Err(injected());
        }
        self.inner.list_users().await
    }

    async fn find_user_by_handle(&self, handle: &str) -> storage::Result<User> {
        self.inner.find_user_by_handle(handle).await
    }

    async fn create_user(&self, req: &CreateUserRequest) -> storage::Result<User> {
        self.inner.create_user(req).await
    }

    async fn update_user(&self, user_id: Uuid, req: &UpdateUserRequest) -> storage::Result<User> {
        self.inner.update_user(user_id, req).await
    }

    async fn delete_user(&self, user_id: Uuid) -> storage::Result<()> {
        self.inner.delete_user(user_id).await
    }
}

#[async_trait]
impl ContestStore for FaultyStore {
    async fn list_contests(&self) -> storage::Result<Vec<Contest>> {
        self.inner.list_contests().await
    }

    async fn find_contest_by_external_id(&self, external_id: i32) -> storage::Result<Contest> {
        self.inner.find_contest_by_external_id(external_id).await
    }

    async fn insert_contest_if_absent(&self, contest: &NewContest) -> storage::Result<bool> {
        self.inner.insert_contest_if_absent(contest).await
    }

    async fn create_contest(&self, contest: &NewContest) -> storage::Result<Contest> {
        self.inner.create_contest(contest).await
    }

    async fn delete_contest(&self, contest_id: Uuid) -> storage::Result<()> {
        self.inner.delete_contest(contest_id).await
    }

    async fn delete_all_contests(&self) -> storage::Result<u64> {
        self.inner.delete_all_contests().await
    }
}

#[async_trait]
impl ResultStore for FaultyStore {
    async fn upsert_result(&self, result: &ResultUpsert) -> storage::Result<ContestResult> {
        if !self.write_delay.is_zero() {
            tokio::time::sleep(self.write_delay).await;
        }
        if self.failing_user == Some(result.user_id) {
            return Err(injected());
        }
        self.inner.upsert_result(result).await
    }

    async fn list_results(&self) -> storage::Result<Vec<ContestResult>> {
        self.inner.list_results().await
    }
}

#[async_trait]
impl RefreshLogStore for FaultyStore {
    async fn record_refresh(&self, at: NaiveDateTime) -> storage::Result<RefreshLog> {
        self.inner.record_refresh(at).await
    }

    async fn latest_refresh(&self) -> storage::Result<Option<RefreshLog>> {
        self.inner.latest_refresh().await
    }
}

#[async_trait]
impl RunLockStore for FaultyStore {
    async fn try_lock_run(&self) -> storage::Result<Option<RunLease>> {
        self.inner.try_lock_run().await
    }
}
