use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Audit row written after each completed results synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RefreshLog {
    pub refresh_id: Uuid,
    pub last_refreshed: NaiveDateTime,
}
