use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One user's outcome in one contest. Unique per (user_id, contest_id).
///
/// `rank == 0` means the user was not found in the standings, in which case
/// `points` is always 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ContestResult {
    pub result_id: Uuid,
    pub user_id: Uuid,
    pub contest_id: Uuid,
    pub rank: i32,
    pub points: i32,
    pub last_updated: NaiveDateTime,
}

impl ContestResult {
    pub fn participated(&self) -> bool {
        self.rank > 0
    }
}
