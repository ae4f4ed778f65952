//! Period model - the calendar window a target is measured against.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A fixed-length window `[start, start + length_days)` starting at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// First instant of the period (local midnight)
    pub start: NaiveDateTime,

    /// Length in whole days
    pub length_days: u32,
}

impl Period {
    /// Create a period starting at midnight of `start`.
    pub fn new(start: NaiveDate, length_days: u32) -> Self {
        Self {
            start: start.and_time(chrono::NaiveTime::MIN),
            length_days,
        }
    }

    /// Last second of the period (inclusive end used for display).
    pub fn end(&self) -> NaiveDateTime {
        self.end_exclusive() - Duration::seconds(1)
    }

    /// First instant after the period.
    pub fn end_exclusive(&self) -> NaiveDateTime {
        self.start + Duration::days(self.length_days as i64)
    }

    /// Whether `at` falls within `[start, end_exclusive)`.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at < self.end_exclusive()
    }

    /// Calendar date of day `offset` of the period.
    pub fn date_of_day(&self, offset: u32) -> NaiveDate {
        self.start.date() + Duration::days(offset as i64)
    }

    /// Length as a float, for curve arithmetic.
    pub fn length(&self) -> f64 {
        self.length_days as f64
    }
}
