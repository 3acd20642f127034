use serde::{Deserialize, Serialize};

use crate::error::{ImporterError, Result};
use crate::models::{ContestSummary, Standings, StandingsRow};

/// Envelope wrapping every Codeforces API answer.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiResponse<T> {
    pub status: String,
    pub comment: Option<String>,
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> Result<T> {
        if self.status != "OK" {
            return Err(ImporterError::ApiError(
                self.comment.unwrap_or(self.status),
            ));
        }
        self.result
            .ok_or_else(|| ImporterError::ApiError("response has no result".to_string()))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Contest {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub phase: String,
    #[serde(rename = "startTimeSeconds", default)]
    pub start_time_seconds: Option<i64>,
}

impl From<Contest> for ContestSummary {
    fn from(contest: Contest) -> Self {
        Self {
            external_id: contest.id,
            name: contest.name,
            start_time: contest.start_time_seconds.unwrap_or_default(),
            phase: contest.phase,
            kind: contest.kind,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StandingsResult {
    pub contest: Contest,
    pub rows: Vec<RanklistRow>,
}

impl From<StandingsResult> for Standings {
    fn from(result: StandingsResult) -> Self {
        Self {
            contest_name: result.contest.name,
            rows: result
                .rows
                .into_iter()
                .map(|row| StandingsRow {
                    rank: row.rank,
                    handles: row.party.members.into_iter().map(|m| m.handle).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RanklistRow {
    pub party: Party,
    pub rank: i32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Party {
    pub members: Vec<Member>,
    #[serde(rename = "participantType", default)]
    pub participant_type: Option<String>,
    #[serde(rename = "teamName", default)]
    pub team_name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Member {
    pub handle: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UserInfo {
    pub handle: String,
}
