//! Expected-by-now curve.
//!
//! The curve is continuous within a day: the fraction of the current day that
//! has passed is added to the whole days elapsed, so the expectation creeps
//! forward between refreshes instead of stepping at midnight.

use chrono::{NaiveDateTime, Timelike};
use habitboard_core::Period;

const SECONDS_PER_DAY: f64 = 86_400.0;
const HOURS_PER_DAY: f64 = 24.0;

/// Whole days since the period started, clamped to the period.
pub fn day_of_period(period: &Period, now: NaiveDateTime) -> u32 {
    let days = (now.date() - period.start.date()).num_days();
    days.clamp(0, period.length_days.saturating_sub(1) as i64) as u32
}

/// Fraction of the local day that has passed, in `[0, 1)`.
pub fn day_fraction(now: NaiveDateTime) -> f64 {
    now.time().num_seconds_from_midnight() as f64 / SECONDS_PER_DAY
}

/// Fractional days elapsed, shifted later by the grace offset and clamped to
/// `[0, length_days]`.
pub fn days_elapsed(period: &Period, now: NaiveDateTime, grace_hours: f64) -> f64 {
    let raw = day_of_period(period, now) as f64 + day_fraction(now);
    let shifted = raw - grace_hours.max(0.0) / HOURS_PER_DAY;
    shifted.clamp(0.0, period.length())
}

/// `target * days_elapsed / length_days`.
pub fn expected_by_now(period_target: f64, days_elapsed: f64, length_days: f64) -> f64 {
    if length_days <= 0.0 {
        return 0.0;
    }
    period_target * (days_elapsed.clamp(0.0, length_days) / length_days)
}

/// Whole days left in the period after today.
pub fn days_remaining(length_days: u32, day_of_period: u32) -> u32 {
    length_days.saturating_sub(1).saturating_sub(day_of_period)
}
