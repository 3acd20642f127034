use crate::models::DivisionTier;

/// Participation credit awarded to anyone found in the standings.
pub const PARTICIPATION_POINTS: i32 = 2;

/// Logarithmic scale applied before the division multiplier.
const SCALE: f64 = 10.0;

/// Points for finishing at `rank` among `total` official participants.
///
/// `floor(max(10 * d * log10((total + 1) / (rank + 1)), 0)) + 2` where `d` is
/// the division multiplier. A rank or total of 0 means the user did not take
/// part and scores nothing, not even the participation credit.
///
/// ```
/// use storage::models::DivisionTier;
/// use storage::services::scoring::compute_points;
///
/// assert_eq!(compute_points(1, 100, DivisionTier::Div1), 19);
/// assert_eq!(compute_points(0, 100, DivisionTier::Div1), 0);
/// ```
pub fn compute_points(rank: i32, total: usize, division: DivisionTier) -> i32 {
    if total == 0 || rank <= 0 {
        return 0;
    }

    let ratio = (total as f64 + 1.0) / (f64::from(rank) + 1.0);
    let raw = SCALE * division.multiplier() * ratio.log10();

    raw.max(0.0).floor() as i32 + PARTICIPATION_POINTS
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIERS: [DivisionTier; 4] = [
        DivisionTier::Div1,
        DivisionTier::Div2,
        DivisionTier::Div3,
        DivisionTier::Div4,
    ];

    #[test]
    fn test_reference_values() {
        assert_eq!(compute_points(1, 100, DivisionTier::Div1), 19);
        assert_eq!(compute_points(50, 100, DivisionTier::Div1), 4);
        assert_eq!(compute_points(0, 100, DivisionTier::Div1), 0);
        assert_eq!(compute_points(5, 0, DivisionTier::Div1), 0);
    }

    #[test]
    fn test_small_contest() {
        // log10(3 / 2) * 10 = 1.76
        assert_eq!(compute_points(1, 2, DivisionTier::Div2), 3);
        assert_eq!(compute_points(2, 2, DivisionTier::Div2), 2);
    }

    #[test]
    fn test_division_multipliers_applied() {
        // log10(1001 / 2) * 10 = 26.99
        assert_eq!(compute_points(1, 1000, DivisionTier::Div1), 28);
        assert_eq!(compute_points(1, 1000, DivisionTier::Div2), 28);
        // 26.99 * 0.67 = 18.08, 26.99 * 0.33 = 8.90
        assert_eq!(compute_points(1, 1000, DivisionTier::Div3), 20);
        assert_eq!(compute_points(1, 1000, DivisionTier::Div4), 10);
    }

    #[test]
    fn test_rank_beyond_total_keeps_participation_credit() {
        assert_eq!(compute_points(150, 100, DivisionTier::Div1), PARTICIPATION_POINTS);
    }

    #[test]
    fn test_zero_only_without_participation() {
        for tier in TIERS {
            for total in [1usize, 2, 10, 500] {
                for rank in 1..=(total as i32 + 5) {
                    assert!(compute_points(rank, total, tier) >= PARTICIPATION_POINTS);
                }
                assert_eq!(compute_points(0, total, tier), 0);
            }
        }
    }

    #[test]
    fn test_non_increasing_in_rank() {
        for tier in TIERS {
            let total = 750;
            let mut previous = compute_points(1, total, tier);
            for rank in 2..=total as i32 {
                let current = compute_points(rank, total, tier);
                assert!(current <= previous, "rank {rank} scored higher than rank {}", rank - 1);
                previous = current;
            }
        }
    }

    #[test]
    fn test_monotonic_in_multiplier() {
        for total in [10usize, 100, 5000] {
            for rank in 1..=total as i32 {
                let div1 = compute_points(rank, total, DivisionTier::Div1);
                let div2 = compute_points(rank, total, DivisionTier::Div2);
                let div3 = compute_points(rank, total, DivisionTier::Div3);
                let div4 = compute_points(rank, total, DivisionTier::Div4);
                assert_eq!(div1, div2);
                assert!(div3 <= div1);
                assert!(div4 <= div3);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        for rank in [1, 7, 42] {
            assert_eq!(
                compute_points(rank, 300, DivisionTier::Div3),
                compute_points(rank, 300, DivisionTier::Div3)
            );
        }
    }
}
