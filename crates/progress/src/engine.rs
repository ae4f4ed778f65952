//! The progress engine - turns a goal config, a counter value and an instant
//! into a [`ProgressSnapshot`].

use chrono::NaiveDateTime;
use habitboard_core::{Goal, GoalConfig, Period, ProgressSnapshot};
use serde::{Deserialize, Serialize};

use crate::curve;
use crate::{ClassificationPolicy, PeriodPolicy};

/// Configuration for the progress engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How period boundaries are computed
    #[serde(default)]
    pub period: PeriodPolicy,
    /// How status is derived
    #[serde(default)]
    pub classification: ClassificationPolicy,
}

/// Pure progress computation. Holds only its immutable configuration.
#[derive(Debug, Clone, Default)]
pub struct ProgressEngine {
    config: EngineConfig,
}

impl ProgressEngine {
    /// Create an engine with the default fortnight / binary policies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The period containing `now`.
    pub fn period_at(&self, now: NaiveDateTime) -> Period {
        self.config.period.period_at(now)
    }

    /// Compute a snapshot for one goal at `now`.
    pub fn snapshot(&self, config: &GoalConfig, current_count: u64, now: NaiveDateTime) -> ProgressSnapshot {
        let period = self.period_at(now);
        self.snapshot_in(&period, config, current_count, now)
    }

    /// Compute a snapshot within an already-resolved period.
    pub fn snapshot_in(
        &self,
        period: &Period,
        config: &GoalConfig,
        current_count: u64,
        now: NaiveDateTime,
    ) -> ProgressSnapshot {
        let day_of_period = curve::day_of_period(period, now);
        let period_target = config.period_target(period.length_days);
        let elapsed = curve::days_elapsed(period, now, config.grace_hours);
        let expected_by_now = curve::expected_by_now(period_target, elapsed, period.length());

        ProgressSnapshot {
            current_count,
            period_target,
            expected_by_now,
            status: self.config.classification.classify(current_count, expected_by_now),
            day_of_period,
            days_remaining: curve::days_remaining(period.length_days, day_of_period),
        }
    }

    /// Overwrite a goal's snapshot in place.
    pub fn update(&self, goal: &mut Goal, period: &Period, current_count: u64, now: NaiveDateTime) {
        goal.progress = self.snapshot_in(period, &goal.config, current_count, now);
    }
}
