//! Storage seams used by the synchronization engine.
//!
//! Components receive a store instead of reaching for a process-wide handle, so the
//! Postgres-backed [`Database`](crate::Database) and the in-memory
//! [`MemoryStore`](crate::memory::MemoryStore) are interchangeable.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::Database;
use crate::dto::contest::NewContest;
use crate::dto::result::ResultUpsert;
use crate::dto::user::{CreateUserRequest, UpdateUserRequest};
use crate::error::Result;
use crate::lock::RunLease;
use crate::models::{Contest, ContestResult, RefreshLog, User};
use crate::repository::{
    contest::ContestRepository, refresh_log::RefreshLogRepository, result::ResultRepository,
    run_lock::RunLockRepository, user::UserRepository,
};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// The roster, ordered by handle.
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn find_user_by_handle(&self, handle: &str) -> Result<User>;
    async fn create_user(&self, req: &CreateUserRequest) -> Result<User>;
    async fn update_user(&self, user_id: Uuid, req: &UpdateUserRequest) -> Result<User>;
    async fn delete_user(&self, user_id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait ContestStore: Send + Sync {
    /// The tracked set, most recent first.
    async fn list_contests(&self) -> Result<Vec<Contest>>;
    async fn find_contest_by_external_id(&self, external_id: i32) -> Result<Contest>;
    /// Returns `false` when the external id was already tracked.
    async fn insert_contest_if_absent(&self, contest: &NewContest) -> Result<bool>;
    async fn create_contest(&self, contest: &NewContest) -> Result<Contest>;
    async fn delete_contest(&self, contest_id: Uuid) -> Result<()>;
    async fn delete_all_contests(&self) -> Result<u64>;
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn upsert_result(&self, result: &ResultUpsert) -> Result<ContestResult>;
    async fn list_results(&self) -> Result<Vec<ContestResult>>;
}

#[async_trait]
pub trait RefreshLogStore: Send + Sync {
    async fn record_refresh(&self, at: NaiveDateTime) -> Result<RefreshLog>;
    async fn latest_refresh(&self) -> Result<Option<RefreshLog>>;
}

#[async_trait]
pub trait RunLockStore: Send + Sync {
    /// Take the results synchronization lock, or `None` when another run,
    /// in this process or any other sharing the store, already holds it.
    async fn try_lock_run(&self) -> Result<Option<RunLease>>;
}

pub trait Store: UserStore + ContestStore + ResultStore + RefreshLogStore + RunLockStore {}

impl<T> Store for T where
    T: UserStore + ContestStore + ResultStore + RefreshLogStore + RunLockStore
{
}

#[async_trait]
impl UserStore for Database {
    async fn list_users(&self) -> Result<Vec<User>> {
        UserRepository::new(self.pool()).list().await
    }

    async fn find_user_by_handle(&self, handle: &str) -> Result<User> {
        UserRepository::new(self.pool()).find_by_handle(handle).await
    }

    async fn create_user(&self, req: &CreateUserRequest) -> Result<User> {
        req.validate()?;
        UserRepository::new(self.pool()).create(req).await
    }

    async fn update_user(&self, user_id: Uuid, req: &UpdateUserRequest) -> Result<User> {
        req.validate()?;
        UserRepository::new(self.pool())
            .update_display_name(user_id, req.display_name.as_deref())
            .await
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        UserRepository::new(self.pool()).delete(user_id).await
    }
}

#[async_trait]
impl ContestStore for Database {
    async fn list_contests(&self) -> Result<Vec<Contest>> {
        ContestRepository::new(self.pool()).list().await
    }

    async fn find_contest_by_external_id(&self, external_id: i32) -> Result<Contest> {
        ContestRepository::new(self.pool())
            .find_by_external_id(external_id)
            .await
    }

    async fn insert_contest_if_absent(&self, contest: &NewContest) -> Result<bool> {
        ContestRepository::new(self.pool())
            .insert_if_absent(contest)
            .await
    }

    async fn create_contest(&self, contest: &NewContest) -> Result<Contest> {
        ContestRepository::new(self.pool()).create(contest).await
    }

    async fn delete_contest(&self, contest_id: Uuid) -> Result<()> {
        ContestRepository::new(self.pool()).delete(contest_id).await
    }

    async fn delete_all_contests(&self) -> Result<u64> {
        ContestRepository::new(self.pool()).delete_all().await
    }
}

#[async_trait]
impl ResultStore for Database {
    async fn upsert_result(&self, result: &ResultUpsert) -> Result<ContestResult> {
        ResultRepository::new(self.pool()).upsert(result).await
    }

    async fn list_results(&self) -> Result<Vec<ContestResult>> {
        ResultRepository::new(self.pool()).list().await
    }
}

#[async_trait]
impl RefreshLogStore for Database {
    async fn record_refresh(&self, at: NaiveDateTime) -> Result<RefreshLog> {
        RefreshLogRepository::new(self.pool()).record(at).await
    }

    async fn latest_refresh(&self) -> Result<Option<RefreshLog>> {
        RefreshLogRepository::new(self.pool()).latest().await
    }
}

#[async_trait]
impl RunLockStore for Database {
    async fn try_lock_run(&self) -> Result<Option<RunLease>> {
        RunLockRepository::new(self.pool()).try_acquire().await
    }
}
