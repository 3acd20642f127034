use chrono::NaiveDateTime;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::RefreshLog;

pub struct RefreshLogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RefreshLogRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn record(&self, at: NaiveDateTime) -> Result<RefreshLog> {
        let entry = sqlx::query_as::<_, RefreshLog>(
            r#"
            INSERT INTO refresh_log (last_refreshed)
            VALUES ($1)
            RETURNING refresh_id, last_refreshed
            "#,
        )
        .bind(at)
        .fetch_one(self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn latest(&self) -> Result<Option<RefreshLog>> {
        let entry = sqlx::query_as::<_, RefreshLog>(
            r#"
            SELECT refresh_id, last_refreshed
            FROM refresh_log
            ORDER BY last_refreshed DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(entry)
    }
}
