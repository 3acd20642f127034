//! In-memory [`Store`](crate::Store) with the same semantics as the Postgres one.
//!
//! Cloning a `MemoryStore` yields another handle to the same data.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;
use validator::Validate;

use crate::dto::contest::NewContest;
use crate::dto::result::ResultUpsert;
use crate::dto::user::{CreateUserRequest, UpdateUserRequest};
use crate::error::{Result, StorageError};
use crate::lock::RunLease;
use crate::models::{Contest, ContestResult, RefreshLog, User};
use crate::store::{ContestStore, RefreshLogStore, ResultStore, RunLockStore, UserStore};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    contests: Vec<Contest>,
    results: Vec<ContestResult>,
    refresh_log: Vec<RefreshLog>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    run_lock: Arc<Mutex<()>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users = tables.users.clone();
        users.sort_by(|a, b| a.handle.cmp(&b.handle));
        Ok(users)
    }

    async fn find_user_by_handle(&self, handle: &str) -> Result<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|user| user.handle == handle)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn create_user(&self, req: &CreateUserRequest) -> Result<User> {
        req.validate()?;

        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|user| user.handle == req.handle) {
            return Err(StorageError::ConstraintViolation(
                "Handle is already tracked".to_string(),
            ));
        }

        let user = User {
            user_id: Uuid::new_v4(),
            handle: req.handle.clone(),
            display_name: req.display_name.clone(),
            created_at: Utc::now().naive_utc(),
        };
        tables.users.push(user.clone());

        Ok(user)
    }

    async fn update_user(&self, user_id: Uuid, req: &UpdateUserRequest) -> Result<User> {
        req.validate()?;

        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .iter_mut()
            .find(|user| user.user_id == user_id)
            .ok_or(StorageError::NotFound)?;

        user.display_name = req.display_name.clone();
        Ok(user.clone())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|user| user.user_id != user_id);

        if tables.users.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ContestStore for MemoryStore {
    async fn list_contests(&self) -> Result<Vec<Contest>> {
        let tables = self.tables.read().await;
        let mut contests = tables.contests.clone();
        contests.sort_by(|a, b| {
            b.start_time
                .cmp(&a.start_time)
                .then_with(|| b.external_id.cmp(&a.external_id))
        });
        Ok(contests)
    }

    async fn find_contest_by_external_id(&self, external_id: i32) -> Result<Contest> {
        let tables = self.tables.read().await;
        tables
            .contests
            .iter()
            .find(|contest| contest.external_id == external_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn insert_contest_if_absent(&self, contest: &NewContest) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables
            .contests
            .iter()
            .any(|existing| existing.external_id == contest.external_id)
        {
            return Ok(false);
        }

        tables.contests.push(new_contest_row(contest));
        Ok(true)
    }

    async fn create_contest(&self, contest: &NewContest) -> Result<Contest> {
        let mut tables = self.tables.write().await;
        if tables
            .contests
            .iter()
            .any(|existing| existing.external_id == contest.external_id)
        {
            return Err(StorageError::ConstraintViolation(
                "Contest is already tracked".to_string(),
            ));
        }

        let row = new_contest_row(contest);
        tables.contests.push(row.clone());
        Ok(row)
    }

    async fn delete_contest(&self, contest_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.contests.len();
        tables.contests.retain(|contest| contest.contest_id != contest_id);

        if tables.contests.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_all_contests(&self) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let removed = tables.contests.len() as u64;
        tables.contests.clear();
        Ok(removed)
    }
}

fn new_contest_row(contest: &NewContest) -> Contest {
    Contest {
        contest_id: Uuid::new_v4(),
        external_id: contest.external_id,
        name: contest.name.clone(),
        start_time: contest.start_time,
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn upsert_result(&self, result: &ResultUpsert) -> Result<ContestResult> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables
            .results
            .iter_mut()
            .find(|row| row.user_id == result.user_id && row.contest_id == result.contest_id)
        {
            existing.rank = result.rank;
            existing.points = result.points;
            existing.last_updated = result.last_updated;
            return Ok(existing.clone());
        }

        let row = ContestResult {
            result_id: Uuid::new_v4(),
            user_id: result.user_id,
            contest_id: result.contest_id,
            rank: result.rank,
            points: result.points,
            last_updated: result.last_updated,
        };
        tables.results.push(row.clone());
        Ok(row)
    }

    async fn list_results(&self) -> Result<Vec<ContestResult>> {
        Ok(self.tables.read().await.results.clone())
    }
}

#[async_trait]
impl RefreshLogStore for MemoryStore {
    async fn record_refresh(&self, at: NaiveDateTime) -> Result<RefreshLog> {
        let entry = RefreshLog {
            refresh_id: Uuid::new_v4(),
            last_refreshed: at,
        };
        self.tables.write().await.refresh_log.push(entry.clone());
        Ok(entry)
    }

    async fn latest_refresh(&self) -> Result<Option<RefreshLog>> {
        let tables = self.tables.read().await;
        Ok(tables
            .refresh_log
            .iter()
            .max_by_key(|entry| entry.last_refreshed)
            .cloned())
    }
}

#[async_trait]
impl RunLockStore for MemoryStore {
    async fn try_lock_run(&self) -> Result<Option<RunLease>> {
        Ok(self
            .run_lock
            .clone()
            .try_lock_owned()
            .ok()
            .map(RunLease::memory))
    }
}
