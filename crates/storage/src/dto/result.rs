use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Values written for one (user, contest) pair. Overwrites any previous row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultUpsert {
    pub user_id: Uuid,
    pub contest_id: Uuid,
    pub rank: i32,
    pub points: i32,
    pub last_updated: NaiveDateTime,
}
