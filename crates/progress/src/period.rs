//! Period boundary policies.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use habitboard_core::Period;
use serde::{Deserialize, Deserializer, Serialize};

const SECONDS_PER_DAY: i64 = 86_400;

/// How period boundaries are derived from the current instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum PeriodPolicy {
    /// Fixed-length periods counted from a fixed anchor date.
    Anchored {
        /// Day the first period starts on
        anchor: NaiveDate,
        /// Period length in days, at least 1
        #[serde(deserialize_with = "positive_days")]
        length_days: u32,
    },
    /// Seven-day periods starting on a fixed weekday.
    RollingWeek {
        /// Weekday each period starts on
        start: Weekday,
    },
}

fn positive_days<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let days = u32::deserialize(deserializer)?;
    if days == 0 {
        return Err(serde::de::Error::custom("length_days must be at least 1"));
    }
    Ok(days)
}

impl PeriodPolicy {
    /// Two-week periods anchored on Sunday 2020-01-05.
    pub fn fortnight() -> Self {
        Self::Anchored {
            anchor: NaiveDate::from_ymd_opt(2020, 1, 5).unwrap_or_default(),
            length_days: 14,
        }
    }

    /// Period length in days. A hand-built zero length is treated as 1.
    pub fn length_days(&self) -> u32 {
        match self {
            PeriodPolicy::Anchored { length_days, .. } => (*length_days).max(1),
            PeriodPolicy::RollingWeek { .. } => 7,
        }
    }

    /// The period containing `now`.
    pub fn period_at(&self, now: NaiveDateTime) -> Period {
        match *self {
            PeriodPolicy::Anchored { anchor, .. } => {
                let length = self.length_days() as i64;
                let anchor_start = anchor.and_time(chrono::NaiveTime::MIN);
                let days_since_anchor =
                    (now - anchor_start).num_seconds().div_euclid(SECONDS_PER_DAY);
                let index = days_since_anchor.div_euclid(length);
                Period::new(anchor + Duration::days(index * length), length as u32)
            }
            PeriodPolicy::RollingWeek { start } => {
                let today = now.date();
                let back = (today.weekday().num_days_from_monday() + 7
                    - start.num_days_from_monday())
                    % 7;
                Period::new(today - Duration::days(back as i64), 7)
            }
        }
    }
}

impl Default for PeriodPolicy {
    fn default() -> Self {
        Self::fortnight()
    }
}
