use crate::Result;
use crate::models::{ContestSummary, Standings};

/// Source of contest catalogs and standings.
#[async_trait::async_trait]
pub trait StandingsProvider: Send + Sync {
    /// The full contest list, optionally restricted to a group scope.
    async fn list_contests(&self, scope: Option<&str>) -> Result<Vec<ContestSummary>>;

    /// Standings of one contest with unofficial entries excluded.
    async fn fetch_standings(&self, contest_id: i32) -> Result<Standings>;

    /// Header information of one contest.
    async fn fetch_contest(&self, contest_id: i32) -> Result<ContestSummary>;

    /// Whether the handle exists on the provider.
    async fn lookup_user(&self, handle: &str) -> Result<bool>;

    fn name(&self) -> &'static str;
}
