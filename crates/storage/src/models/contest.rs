use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::DivisionTier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Contest {
    pub contest_id: Uuid,
    pub external_id: i32,
    pub name: String,
    /// Epoch seconds.
    pub start_time: i64,
}

impl Contest {
    /// Tier derived from the stored name. Scoring uses the name from the
    /// standings payload instead, see `DivisionTier::classify`.
    pub fn division(&self) -> DivisionTier {
        DivisionTier::classify(&self.name)
    }
}
