//! Status classification.

use habitboard_core::GoalStatus;
use serde::{Deserialize, Serialize};

/// Half-unit band around the curve that still counts as on track.
pub const TOLERANCE: f64 = 0.5;

/// How a count is compared with the expected-by-now value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationPolicy {
    /// `behind` below the curve, otherwise `on_track`.
    #[default]
    Binary,
    /// `ahead` / `behind` only outside a half-unit band.
    ToleranceBand,
}

impl ClassificationPolicy {
    /// Classify `current` against `expected`.
    pub fn classify(&self, current: u64, expected: f64) -> GoalStatus {
        let current = current as f64;
        match self {
            ClassificationPolicy::Binary => {
                if current < expected {
                    GoalStatus::Behind
                } else {
                    GoalStatus::OnTrack
                }
            }
            ClassificationPolicy::ToleranceBand => {
                let diff = current - expected;
                if diff >= TOLERANCE {
                    GoalStatus::Ahead
                } else if diff <= -TOLERANCE {
                    GoalStatus::Behind
                } else {
                    GoalStatus::OnTrack
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_tie_is_on_track() {
        let policy = ClassificationPolicy::Binary;
        assert_eq!(policy.classify(2, 2.0), GoalStatus::OnTrack);
        assert_eq!(policy.classify(1, 1.01), GoalStatus::Behind);
        assert_eq!(policy.classify(9, 2.0), GoalStatus::OnTrack);
    }

    #[test]
    fn test_tolerance_band() {
        let policy = ClassificationPolicy::ToleranceBand;
        assert_eq!(policy.classify(3, 2.5), GoalStatus::Ahead);
        assert_eq!(policy.classify(2, 2.4), GoalStatus::OnTrack);
        assert_eq!(policy.classify(2, 2.5), GoalStatus::Behind);
        assert_eq!(policy.classify(0, 0.0), GoalStatus::OnTrack);
    }
}
