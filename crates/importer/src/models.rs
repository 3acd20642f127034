//! Provider-neutral shapes consumed by the synchronization engine.

use serde::{Deserialize, Serialize};
use storage::dto::contest::NewContest;

/// Contest phase value for contests whose final standings are known.
pub const PHASE_FINISHED: &str = "FINISHED";
/// Contest type value for standard rated rounds.
pub const TYPE_CF: &str = "CF";

/// One entry of the provider's contest catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestSummary {
    pub external_id: i32,
    pub name: String,
    pub start_time: i64,
    pub phase: String,
    pub kind: String,
}

impl ContestSummary {
    /// Finished, standard-format contests are the only ones worth tracking.
    pub fn is_trackable(&self) -> bool {
        self.phase == PHASE_FINISHED && self.kind == TYPE_CF
    }

    pub fn to_new_contest(&self) -> NewContest {
        NewContest {
            external_id: self.external_id,
            name: self.name.clone(),
            start_time: self.start_time,
        }
    }
}

/// Final standings of one contest, official participants only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    pub contest_name: String,
    pub rows: Vec<StandingsRow>,
}

/// A ranked party: a single contestant or a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub rank: i32,
    pub handles: Vec<String>,
}

impl Standings {
    pub fn participant_count(&self) -> usize {
        self.rows.len()
    }
}
