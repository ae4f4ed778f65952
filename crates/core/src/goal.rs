//! Goal model - a tracked habit with its periodic target.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::id::CounterRef;
use crate::progress::ProgressSnapshot;

/// Days in a calendar week.
pub const DAYS_PER_WEEK: f64 = 7.0;

/// How the configured target relates to the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetBasis {
    /// Target is a weekly rate, scaled to the period length.
    #[default]
    PerWeek,
    /// Target applies to the whole period as-is.
    PerPeriod,
}

/// Immutable configuration for one goal.
///
/// Built by the discovery layer and validated there. The engines assume
/// every `GoalConfig` they receive satisfies [`GoalConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
    /// Stable identifier (the label name it was parsed from)
    pub id: String,

    /// Periodic target, may be fractional (e.g. 1.5 per week)
    pub target: f64,

    /// Whether `target` is a weekly rate or a whole-period count
    #[serde(default)]
    pub basis: TargetBasis,

    /// Optional glyph shown before the goal name
    #[serde(default)]
    pub glyph: Option<String>,

    /// Optional alert sound identifier
    #[serde(default)]
    pub sound: Option<String>,

    /// Grace offset in hours; delays when a day's expectation counts
    #[serde(default)]
    pub grace_hours: f64,
}

impl GoalConfig {
    /// Create a validated weekly-rate config.
    pub fn new(id: impl Into<String>, target: f64) -> Result<Self> {
        let config = Self {
            id: id.into(),
            target,
            basis: TargetBasis::PerWeek,
            glyph: None,
            sound: None,
            grace_hours: 0.0,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the target basis.
    pub fn with_basis(mut self, basis: TargetBasis) -> Self {
        self.basis = basis;
        self
    }

    /// Set the display glyph.
    pub fn with_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.glyph = Some(glyph.into());
        self
    }

    /// Set the alert sound.
    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    /// Set the grace offset. Validated again so a bad offset never slips through.
    pub fn with_grace_hours(mut self, hours: f64) -> Result<Self> {
        self.grace_hours = hours;
        self.validate()?;
        Ok(self)
    }

    /// Check the config invariants.
    pub fn validate(&self) -> Result<()> {
        if !self.target.is_finite() || self.target <= 0.0 {
            return Err(CoreError::invalid_config(
                &self.id,
                format!("target must be a positive number, got {}", self.target),
            ));
        }
        if !self.grace_hours.is_finite() || self.grace_hours < 0.0 {
            return Err(CoreError::invalid_config(
                &self.id,
                format!("grace offset must be zero or more hours, got {}", self.grace_hours),
            ));
        }
        Ok(())
    }

    /// Target for a period of `length_days` days.
    pub fn period_target(&self, length_days: u32) -> f64 {
        match self.basis {
            TargetBasis::PerWeek => self.target * (length_days as f64 / DAYS_PER_WEEK),
            TargetBasis::PerPeriod => self.target,
        }
    }
}

/// One tracked habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Counter the goal reads from
    pub counter: CounterRef,

    /// Human-readable name
    pub display_name: String,

    /// Goal configuration
    pub config: GoalConfig,

    /// Progress, overwritten on every refresh
    #[serde(default)]
    pub progress: ProgressSnapshot,
}

impl Goal {
    /// Create a goal with an empty snapshot.
    pub fn new(counter: CounterRef, display_name: impl Into<String>, config: GoalConfig) -> Self {
        Self {
            counter,
            display_name: display_name.into(),
            config,
            progress: ProgressSnapshot::default(),
        }
    }

    /// Name as shown on the dashboard, glyph-prefixed when configured.
    pub fn label(&self) -> String {
        match &self.config.glyph {
            Some(glyph) if !glyph.is_empty() => format!("{} {}", glyph, self.display_name),
            _ => self.display_name.clone(),
        }
    }
}
