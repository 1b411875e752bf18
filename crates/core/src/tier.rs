//! Qualitative favorability tiers and the text built from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Five bands of favorability, derived from score as a fraction of `max_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Unfavorable,
    SlightlyFavorable,
    Neutral,
    Favorable,
    VeryFavorable,
}

/// Lower bound of each tier in tenths of `max_value`, highest first.
const THRESHOLDS: [(i128, Tier); 4] = [
    (8, Tier::VeryFavorable),
    (6, Tier::Favorable),
    (4, Tier::Neutral),
    (2, Tier::SlightlyFavorable),
];

impl Tier {
    /// First tier whose threshold `score >= max_value * t` holds.
    ///
    /// Compared in integer tenths so that boundary scores (80 of 100) always
    /// land in the higher tier.
    pub fn for_score(score: i64, max_value: i64) -> Self {
        let scaled = i128::from(score) * 10;
        THRESHOLDS
            .iter()
            .find(|(tenths, _)| scaled >= i128::from(max_value) * tenths)
            .map(|(_, tier)| *tier)
            .unwrap_or(Tier::Unfavorable)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::VeryFavorable => "very favorable",
            Tier::Favorable => "favorable",
            Tier::Neutral => "neutral",
            Tier::SlightlyFavorable => "slightly favorable",
            Tier::Unfavorable => "unfavorable",
        }
    }

    /// Tone the model should take toward a user in this tier
    pub fn tone(&self) -> &'static str {
        match self {
            Tier::VeryFavorable => "intimate and affectionate",
            Tier::Favorable => "warm and friendly",
            Tier::Neutral => "polite and normal",
            Tier::SlightlyFavorable => "polite but somewhat distant",
            Tier::Unfavorable => "cold and distant",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `"score/max_value"`
pub fn format_fraction(score: i64, max_value: i64) -> String {
    format!("{}/{}", score, max_value)
}

/// Instruction text appended to an outbound model request.
pub fn directive(user_id: &str, score: i64, max_value: i64) -> String {
    let tier = Tier::for_score(score, max_value);
    format!(
        "Your favorability toward user {} is {} ({}). Respond to them in a {} tone.",
        user_id,
        format_fraction(score, max_value),
        tier,
        tier.tone()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::for_score(80, 100), Tier::VeryFavorable);
        assert_eq!(Tier::for_score(79, 100), Tier::Favorable);
        assert_eq!(Tier::for_score(60, 100), Tier::Favorable);
        assert_eq!(Tier::for_score(59, 100), Tier::Neutral);
        assert_eq!(Tier::for_score(40, 100), Tier::Neutral);
        assert_eq!(Tier::for_score(39, 100), Tier::SlightlyFavorable);
        assert_eq!(Tier::for_score(20, 100), Tier::SlightlyFavorable);
        assert_eq!(Tier::for_score(19, 100), Tier::Unfavorable);
    }

    #[test]
    fn test_tier_extremes() {
        assert_eq!(Tier::for_score(100, 100), Tier::VeryFavorable);
        assert_eq!(Tier::for_score(250, 100), Tier::VeryFavorable);
        assert_eq!(Tier::for_score(0, 100), Tier::Unfavorable);
        assert_eq!(Tier::for_score(-40, 100), Tier::Unfavorable);
        assert_eq!(Tier::for_score(i64::MAX, i64::MAX), Tier::VeryFavorable);
    }

    #[test]
    fn test_non_decimal_max() {
        // 0.8 * 7 = 5.6
        assert_eq!(Tier::for_score(6, 7), Tier::VeryFavorable);
        assert_eq!(Tier::for_score(5, 7), Tier::Favorable);
    }

    #[test]
    fn test_directive_text() {
        let text = directive("u1", 85, 100);
        assert!(text.contains("u1"));
        assert!(text.contains("85/100"));
        assert!(text.contains("very favorable"));
        assert!(text.contains("intimate and affectionate"));

        assert!(directive("u2", 10, 100).contains("cold and distant"));
    }

    #[test]
    fn test_format_fraction() {
        assert_eq!(format_fraction(42, 100), "42/100");
        assert_eq!(format_fraction(-5, 100), "-5/100");
    }
}
