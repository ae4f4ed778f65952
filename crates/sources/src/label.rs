//! Goal configuration carried in label descriptions.
//!
//! A goal label is named `goal_<anything>` and its description is a JSON
//! object:
//!
//! ```json
//! {"weekly_target": 4, "emoji": "🏋", "sound": "chime", "hours_offset": 18}
//! ```
//!
//! `period_target` may be used instead of `weekly_target` for a target that
//! applies to the whole period.

use habitboard_core::{CoreError, GoalConfig, TargetBasis};
use serde::Deserialize;

/// Label names with this prefix carry goal configuration.
pub const GOAL_LABEL_PREFIX: &str = "goal_";

/// Why a label could not be turned into a goal configuration.
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    /// Description missing or blank
    #[error("label has no description")]
    EmptyDescription,

    /// Description is not the expected JSON object
    #[error("invalid JSON in description: {0}")]
    Json(#[from] serde_json::Error),

    /// Neither target field present
    #[error("missing weekly_target or period_target")]
    MissingTarget,

    /// Both target fields present
    #[error("weekly_target and period_target are mutually exclusive")]
    ConflictingTargets,

    /// Values present but out of range
    #[error(transparent)]
    Invalid(#[from] CoreError),
}

#[derive(Debug, Deserialize)]
struct LabelDescription {
    weekly_target: Option<f64>,
    period_target: Option<f64>,
    emoji: Option<String>,
    sound: Option<String>,
    hours_offset: Option<f64>,
}

/// Whether a label name marks a goal.
pub fn is_goal_label(name: &str) -> bool {
    name.starts_with(GOAL_LABEL_PREFIX)
}

/// Parse and validate the configuration in a goal label's description.
pub fn parse_label_config(name: &str, description: &str) -> Result<GoalConfig, LabelError> {
    if description.trim().is_empty() {
        return Err(LabelError::EmptyDescription);
    }
    let parsed: LabelDescription = serde_json::from_str(description)?;

    let (target, basis) = match (parsed.weekly_target, parsed.period_target) {
        (Some(_), Some(_)) => return Err(LabelError::ConflictingTargets),
        (Some(weekly), None) => (weekly, TargetBasis::PerWeek),
        (None, Some(period)) => (period, TargetBasis::PerPeriod),
        (None, None) => return Err(LabelError::MissingTarget),
    };

    let mut config = GoalConfig::new(name, target)?.with_basis(basis);
    if let Some(emoji) = parsed.emoji.filter(|e| !e.is_empty()) {
        config = config.with_glyph(emoji);
    }
    if let Some(sound) = parsed.sound.filter(|s| !s.is_empty()) {
        config = config.with_sound(sound);
    }
    if let Some(hours) = parsed.hours_offset {
        config = config.with_grace_hours(hours)?;
    }
    Ok(config)
}
