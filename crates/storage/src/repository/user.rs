use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::user::CreateUserRequest;
use crate::error::{Result, StorageError};
use crate::models::User;

/// Repository for tracked users
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the roster ordered by handle
    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, handle, display_name, created_at
            FROM users
            ORDER BY handle ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    pub async fn find_by_handle(&self, handle: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, handle, display_name, created_at
            FROM users
            WHERE handle = $1
            "#,
        )
        .bind(handle)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(user)
    }

    pub async fn create(&self, req: &CreateUserRequest) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (handle, display_name)
            VALUES ($1, $2)
            RETURNING user_id, handle, display_name, created_at
            "#,
        )
        .bind(&req.handle)
        .bind(&req.display_name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::on_unique_violation(e, "Handle is already tracked"))?;

        Ok(user)
    }

    pub async fn update_display_name(
        &self,
        user_id: Uuid,
        display_name: Option<&str>,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET display_name = $2
            WHERE user_id = $1
            RETURNING user_id, handle, display_name, created_at
            "#,
        )
        .bind(user_id)
        .bind(display_name)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(user)
    }

    /// Delete a user. Their result rows are kept.
    pub async fn delete(&self, user_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
