//! Shift definition model.
//!
//! A [`ShiftDefinition`] is a named schedule template with start/end
//! times-of-day and a grace period. A shift is overnight when its end
//! time-of-day is numerically earlier than its start, spanning midnight.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a named schedule template that work segments are matched
/// against.
///
/// # Examples
///
/// ```
/// use attendance_engine::models::ShiftDefinition;
/// use chrono::NaiveTime;
/// use rust_decimal::Decimal;
///
/// let night = ShiftDefinition {
///     id: "shift_night".to_string(),
///     name: "Night".to_string(),
///     start_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
///     end_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
///     expected_hours: Decimal::new(80, 1), // 8.0
///     grace_minutes: None,
/// };
/// assert!(night.is_overnight());
/// assert_eq!(night.duration_minutes(), 480);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    /// Unique identifier for the shift.
    pub id: String,
    /// Human-readable name (e.g., "Morning", "Night").
    pub name: String,
    /// The start time-of-day.
    pub start_time: NaiveTime,
    /// The end time-of-day. Earlier than `start_time` for overnight shifts.
    pub end_time: NaiveTime,
    /// The expected duration of the shift in hours.
    pub expected_hours: Decimal,
    /// Grace-period minutes for this shift. Falls back to the engine
    /// default (15) when absent; a global override takes precedence over
    /// both.
    #[serde(default)]
    pub grace_minutes: Option<i64>,
}

impl ShiftDefinition {
    /// Returns true if this shift spans midnight.
    pub fn is_overnight(&self) -> bool {
        self.end_time < self.start_time
    }

    /// Returns the scheduled duration of the shift in minutes, accounting
    /// for midnight crossing.
    pub fn duration_minutes(&self) -> i64 {
        let start = minutes_of_day(self.start_time);
        let end = minutes_of_day(self.end_time);
        if self.is_overnight() {
            (24 * 60 - start) + end
        } else {
            end - start
        }
    }

    /// Projects the shift's start time-of-day onto the given calendar date.
    pub fn start_instant_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.start_time)
    }

    /// Projects the shift's end time-of-day onto the correct calendar date,
    /// adding a day when the shift crosses midnight.
    pub fn end_instant_on(&self, date: NaiveDate) -> NaiveDateTime {
        if self.is_overnight() {
            date.checked_add_days(Days::new(1))
                .unwrap_or(date)
                .and_time(self.end_time)
        } else {
            date.and_time(self.end_time)
        }
    }
}

/// Returns the number of minutes since midnight for a time-of-day.
fn minutes_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}
