//! Per-refresh progress snapshot.

use serde::{Deserialize, Serialize};

/// Progress relative to the expected-by-now curve.
///
/// `Ahead` only appears under the tolerance-band classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Below the expected count
    Behind,
    /// At or near the expected count
    #[default]
    OnTrack,
    /// Comfortably above the expected count
    Ahead,
}

impl GoalStatus {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Behind => "behind",
            GoalStatus::OnTrack => "on_track",
            GoalStatus::Ahead => "ahead",
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A goal's progress at one instant. Recomputed every refresh, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Current counter value
    pub current_count: u64,

    /// Target for the whole period
    pub period_target: f64,

    /// Expected count by the snapshot instant
    pub expected_by_now: f64,

    /// Classification against `expected_by_now`
    pub status: GoalStatus,

    /// Whole days elapsed since the period started (0-based)
    pub day_of_period: u32,

    /// Whole days left after today
    pub days_remaining: u32,
}

impl ProgressSnapshot {
    /// Share of the period target reached, clamped to `[0, 1]`.
    pub fn fill_fraction(&self) -> f64 {
        fill_fraction(self.current_count, self.period_target)
    }
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self {
            current_count: 0,
            period_target: 0.0,
            expected_by_now: 0.0,
            status: GoalStatus::OnTrack,
            day_of_period: 0,
            days_remaining: 0,
        }
    }
}

/// `min(count / target, 1)`, or 0 for a non-positive target.
pub fn fill_fraction(count: u64, target: f64) -> f64 {
    if target <= 0.0 || !target.is_finite() {
        return 0.0;
    }
    (count as f64 / target).clamp(0.0, 1.0)
}
