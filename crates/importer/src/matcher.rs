use crate::models::Standings;

/// Rank of the first standings row whose party contains `handle`, or 0.
///
/// Handles are compared exactly (case-sensitive). Rows are scanned in order, so
/// if malformed data lists a handle twice the earlier row wins.
pub fn find_rank(standings: &Standings, handle: &str) -> i32 {
    standings
        .rows
        .iter()
        .find(|row| row.handles.iter().any(|member| member == handle))
        .map_or(0, |row| row.rank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StandingsRow;

    fn standings(rows: Vec<(i32, Vec<&str>)>) -> Standings {
        Standings {
            contest_name: "Codeforces Round 1 (Div. 2)".to_string(),
            rows: rows
                .into_iter()
                .map(|(rank, handles)| StandingsRow {
                    rank,
                    handles: handles.iter().map(|h| h.to_string()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_finds_individual() {
        let s = standings(vec![(1, vec!["alice"]), (2, vec!["carol"])]);
        assert_eq!(find_rank(&s, "alice"), 1);
        assert_eq!(find_rank(&s, "carol"), 2);
    }

    #[test]
    fn test_absent_handle_is_zero() {
        let s = standings(vec![(1, vec!["alice"])]);
        assert_eq!(find_rank(&s, "bob"), 0);
        assert_eq!(find_rank(&standings(vec![]), "bob"), 0);
    }

    #[test]
    fn test_team_member_gets_team_rank() {
        let s = standings(vec![(1, vec!["x", "y"]), (2, vec!["alice", "bob", "carol"])]);
        assert_eq!(find_rank(&s, "bob"), 2);
    }

    #[test]
    fn test_exact_match_only() {
        let s = standings(vec![(1, vec!["Alice"]), (2, vec!["alice_2"])]);
        assert_eq!(find_rank(&s, "alice"), 0);
    }

    #[test]
    fn test_first_row_wins_on_duplicates() {
        let s = standings(vec![(3, vec!["dave"]), (1, vec!["alice"]), (7, vec!["alice"])]);
        assert_eq!(find_rank(&s, "alice"), 1);
    }

    #[test]
    fn test_shared_ranks() {
        let s = standings(vec![(1, vec!["a"]), (2, vec!["b"]), (2, vec!["c"]), (4, vec!["d"])]);
        assert_eq!(find_rank(&s, "c"), 2);
        assert_eq!(find_rank(&s, "d"), 4);
    }
}
