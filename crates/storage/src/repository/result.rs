use sqlx::PgPool;

use crate::dto::result::ResultUpsert;
use crate::error::Result;
use crate::models::ContestResult;

pub struct ResultRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ResultRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, result: &ResultUpsert) -> Result<ContestResult> {
        let row = sqlx::query_as::<_, ContestResult>(
            r#"
            INSERT INTO results (user_id, contest_id, rank, points, last_updated)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, contest_id)
            DO UPDATE SET
                rank = EXCLUDED.rank,
                points = EXCLUDED.points,
                last_updated = EXCLUDED.last_updated
            RETURNING result_id, user_id, contest_id, rank, points, last_updated
            "#,
        )
        .bind(result.user_id)
        .bind(result.contest_id)
        .bind(result.rank)
        .bind(result.points)
        .bind(result.last_updated)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Every stored result, including rows whose user or contest is gone.
    pub async fn list(&self) -> Result<Vec<ContestResult>> {
        let rows = sqlx::query_as::<_, ContestResult>(
            r#"
            SELECT result_id, user_id, contest_id, rank, points, last_updated
            FROM results
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
