//! Placement tiers
//!
//! Placement maps to a multiplier through fixed, non-overlapping tiers checked
//! top-down. Early tiers are deliberately steep so that composite rank is
//! dominated by placement rather than raw grade.

use serde::{Deserialize, Serialize};

/// Placement bucket of one category result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionTier {
    Top15,
    Top25,
    Top50,
    Top100,
    /// Beyond 100th place, or no placement at all
    Others,
}

impl PositionTier {
    /// Tiers in evaluation order
    pub const ALL: [PositionTier; 5] = [
        PositionTier::Top15,
        PositionTier::Top25,
        PositionTier::Top50,
        PositionTier::Top100,
        PositionTier::Others,
    ];

    /// Inclusive upper placement bound, `None` for the catch-all tier
    pub fn threshold(self) -> Option<u32> {
        match self {
            PositionTier::Top15 => Some(15),
            PositionTier::Top25 => Some(25),
            PositionTier::Top50 => Some(50),
            PositionTier::Top100 => Some(100),
            PositionTier::Others => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            PositionTier::Top15 => 12.0,
            PositionTier::Top25 => 9.0,
            PositionTier::Top50 => 3.0,
            PositionTier::Top100 => 1.0,
            PositionTier::Others => 0.7,
        }
    }

    /// Tier for a placement; missing placement falls into [`PositionTier::Others`]
    pub fn from_placement(placement: Option<u32>) -> Self {
        let Some(place) = placement else {
            return PositionTier::Others;
        };

        Self::ALL
            .into_iter()
            .find(|tier| tier.threshold().is_some_and(|limit| place <= limit))
            .unwrap_or(PositionTier::Others)
    }

    pub fn label(self) -> &'static str {
        match self {
            PositionTier::Top15 => "Top 15",
            PositionTier::Top25 => "Top 25",
            PositionTier::Top50 => "Top 50",
            PositionTier::Top100 => "Top 100",
            PositionTier::Others => "Others",
        }
    }
}

impl std::fmt::Display for PositionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        let cases = [
            (Some(1), 12.0),
            (Some(15), 12.0),
            (Some(16), 9.0),
            (Some(25), 9.0),
            (Some(26), 3.0),
            (Some(50), 3.0),
            (Some(51), 1.0),
            (Some(100), 1.0),
            (Some(101), 0.7),
            (Some(5000), 0.7),
            (None, 0.7),
        ];

        for (placement, expected) in cases {
            assert_eq!(
                PositionTier::from_placement(placement).multiplier(),
                expected,
                "placement {:?}",
                placement
            );
        }
    }

    #[test]
    fn test_tiers_are_ordered() {
        let thresholds: Vec<u32> = PositionTier::ALL
            .iter()
            .filter_map(|tier| tier.threshold())
            .collect();
        assert!(thresholds.windows(2).all(|pair| pair[0] < pair[1]));

        let multipliers: Vec<f64> = PositionTier::ALL.iter().map(|t| t.multiplier()).collect();
        assert!(multipliers.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn test_display() {
        assert_eq!(PositionTier::Top25.to_string(), "Top 25");
        assert_eq!(PositionTier::Others.to_string(), "Others");
    }
}
