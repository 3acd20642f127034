use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tracked participant. `handle` is the case-sensitive key matched against standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub handle: String,
    pub display_name: Option<String>,
    pub created_at: NaiveDateTime,
}

impl User {
    /// Display name when set, the handle otherwise.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.handle)
    }
}
