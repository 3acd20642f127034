use serde::{Deserialize, Serialize};

/// A contest as announced by the provider, before it is given an internal id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContest {
    pub external_id: i32,
    pub name: String,
    pub start_time: i64,
}
