use serde::{Deserialize, Serialize};
use std::fmt;

/// Difficulty bracket of a contest, inferred from its title.
///
/// The tier is never stored: it is recomputed from the contest name each time
/// results are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DivisionTier {
    Div1,
    Div2,
    Div3,
    Div4,
}

impl DivisionTier {
    /// Classify a contest by the markers in its display name.
    ///
    /// Plain, case-sensitive substring checks in the order "Div. 2", "Div. 3",
    /// "Div. 4"; the first hit wins and a name with no marker is Div. 1. A
    /// combined round such as "Round 900 (Div. 1 + Div. 2)" is therefore Div. 2.
    ///
    /// ```
    /// use storage::models::DivisionTier;
    ///
    /// assert_eq!(DivisionTier::classify("Codeforces Round 1 (Div. 3)"), DivisionTier::Div3);
    /// assert_eq!(DivisionTier::classify("Educational Round 150"), DivisionTier::Div1);
    /// ```
    pub fn classify(contest_name: &str) -> Self {
        if contest_name.contains("Div. 2") {
            DivisionTier::Div2
        } else if contest_name.contains("Div. 3") {
            DivisionTier::Div3
        } else if contest_name.contains("Div. 4") {
            DivisionTier::Div4
        } else {
            DivisionTier::Div1
        }
    }

    /// Scoring multiplier for the tier.
    pub fn multiplier(&self) -> f64 {
        match self {
            DivisionTier::Div1 | DivisionTier::Div2 => 1.0,
            DivisionTier::Div3 => 0.67,
            DivisionTier::Div4 => 0.33,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DivisionTier::Div1 => "Div. 1",
            DivisionTier::Div2 => "Div. 2",
            DivisionTier::Div3 => "Div. 3",
            DivisionTier::Div4 => "Div. 4",
        }
    }
}

impl fmt::Display for DivisionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_markers() {
        assert_eq!(DivisionTier::classify("Codeforces Round 942 (Div. 2)"), DivisionTier::Div2);
        assert_eq!(DivisionTier::classify("Codeforces Round 943 (Div. 3)"), DivisionTier::Div3);
        assert_eq!(DivisionTier::classify("Codeforces Round 944 (Div. 4)"), DivisionTier::Div4);
        assert_eq!(DivisionTier::classify("Codeforces Round 945 (Div. 1)"), DivisionTier::Div1);
    }

    #[test]
    fn test_classify_defaults_to_div1() {
        assert_eq!(DivisionTier::classify("Good Bye 2024"), DivisionTier::Div1);
        assert_eq!(DivisionTier::classify(""), DivisionTier::Div1);
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(DivisionTier::classify("Round (div. 3)"), DivisionTier::Div1);
        assert_eq!(DivisionTier::classify("Round (Div.3)"), DivisionTier::Div1);
    }

    #[test]
    fn test_classify_first_marker_wins() {
        assert_eq!(DivisionTier::classify("Round (Div. 3, Div. 2 rated)"), DivisionTier::Div2);
        assert_eq!(DivisionTier::classify("Round (Div. 4 and Div. 3)"), DivisionTier::Div3);
        assert_eq!(DivisionTier::classify("Round 900 (Div. 1 + Div. 2)"), DivisionTier::Div2);
    }

    #[test]
    fn test_multipliers() {
        assert_eq!(DivisionTier::Div1.multiplier(), 1.0);
        assert_eq!(DivisionTier::Div2.multiplier(), 1.0);
        assert_eq!(DivisionTier::Div3.multiplier(), 0.67);
        assert_eq!(DivisionTier::Div4.multiplier(), 0.33);
    }
}
