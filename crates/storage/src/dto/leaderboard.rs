use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use crate::models::Contest;

#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    /// The tracked contests, most recent first.
    pub contests: Vec<Contest>,
    pub entries: Vec<LeaderboardEntry>,
    pub last_refreshed: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based, dense over the sorted entries.
    pub position: usize,
    pub user_id: Uuid,
    pub handle: String,
    pub display_name: Option<String>,
    pub total_points: i64,
    pub results: Vec<ContestScore>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContestScore {
    pub contest_id: Uuid,
    pub rank: i32,
    pub points: i32,
}

impl LeaderboardEntry {
    pub fn score_for(&self, contest_id: Uuid) -> Option<&ContestScore> {
        self.results.iter().find(|score| score.contest_id == contest_id)
    }
}
