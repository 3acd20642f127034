use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::contest::NewContest;
use crate::error::{Result, StorageError};
use crate::models::Contest;

/// Repository for tracked contests
pub struct ContestRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContestRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all tracked contests, most recent first
    pub async fn list(&self) -> Result<Vec<Contest>> {
        let contests = sqlx::query_as::<_, Contest>(
            r#"
            SELECT contest_id, external_id, name, start_time
            FROM contests
            ORDER BY start_time DESC, external_id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(contests)
    }

    pub async fn find_by_external_id(&self, external_id: i32) -> Result<Contest> {
        let contest = sqlx::query_as::<_, Contest>(
            r#"
            SELECT contest_id, external_id, name, start_time
            FROM contests
            WHERE external_id = $1
            "#,
        )
        .bind(external_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(contest)
    }

    /// Insert unless the external id is already tracked. Existing rows are left untouched.
    pub async fn insert_if_absent(&self, contest: &NewContest) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO contests (external_id, name, start_time)
            VALUES ($1, $2, $3)
            ON CONFLICT (external_id) DO NOTHING
            "#,
        )
        .bind(contest.external_id)
        .bind(&contest.name)
        .bind(contest.start_time)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn create(&self, contest: &NewContest) -> Result<Contest> {
        let contest = sqlx::query_as::<_, Contest>(
            r#"
            INSERT INTO contests (external_id, name, start_time)
            VALUES ($1, $2, $3)
            RETURNING contest_id, external_id, name, start_time
            "#,
        )
        .bind(contest.external_id)
        .bind(&contest.name)
        .bind(contest.start_time)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::on_unique_violation(e, "Contest is already tracked"))?;

        Ok(contest)
    }

    /// Stop tracking a contest. Its result rows are kept.
    pub async fn delete(&self, contest_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM contests WHERE contest_id = $1")
            .bind(contest_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM contests")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
