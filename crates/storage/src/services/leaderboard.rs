use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::dto::leaderboard::{ContestScore, Leaderboard, LeaderboardEntry};
use crate::error::Result;
use crate::models::{Contest, ContestResult, User};
use crate::store::Store;

/// Build the leaderboard from the current roster, tracked contests and stored results.
pub async fn compute_leaderboard<S>(store: &S) -> Result<Leaderboard>
where
    S: Store + ?Sized,
{
    let users = store.list_users().await?;
    let contests = store.list_contests().await?;
    let results = store.list_results().await?;
    let last_refreshed = store
        .latest_refresh()
        .await?
        .map(|entry| entry.last_refreshed);

    let entries = aggregate(&users, &contests, &results);

    Ok(Leaderboard {
        contests,
        entries,
        last_refreshed,
    })
}

/// Sum points per user over results whose contest is still tracked.
///
/// Every user appears, with a total of 0 if nothing qualifies. Entries are sorted
/// by total descending; ties are ordered by handle so the output is reproducible.
/// Positions are dense: 1..=N with no shared places.
pub fn aggregate(
    users: &[User],
    contests: &[Contest],
    results: &[ContestResult],
) -> Vec<LeaderboardEntry> {
    let tracked: HashSet<Uuid> = contests.iter().map(|c| c.contest_id).collect();
    let contest_order: HashMap<Uuid, usize> = contests
        .iter()
        .enumerate()
        .map(|(idx, c)| (c.contest_id, idx))
        .collect();

    let mut per_user: HashMap<Uuid, Vec<&ContestResult>> = HashMap::new();
    for result in results.iter().filter(|r| tracked.contains(&r.contest_id)) {
        per_user.entry(result.user_id).or_default().push(result);
    }

    let mut entries: Vec<LeaderboardEntry> = users
        .iter()
        .map(|user| {
            let mut rows = per_user.remove(&user.user_id).unwrap_or_default();
            rows.sort_by_key(|r| contest_order.get(&r.contest_id).copied());

            LeaderboardEntry {
                position: 0,
                user_id: user.user_id,
                handle: user.handle.clone(),
                display_name: user.display_name.clone(),
                total_points: rows.iter().map(|r| i64::from(r.points)).sum(),
                results: rows
                    .into_iter()
                    .map(|r| ContestScore {
                        contest_id: r.contest_id,
                        rank: r.rank,
                        points: r.points,
                    })
                    .collect(),
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.handle.cmp(&b.handle))
    });

    for (idx, entry) in entries.iter_mut().enumerate() {
        entry.position = idx + 1;
    }

    entries
}
