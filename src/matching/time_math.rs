//! Canonical midnight-crossing time arithmetic.
//!
//! Segmentation, matching, and the late/early calculator all need to place
//! a shift's time-of-day onto a concrete calendar date while accounting for
//! midnight crossing. That arithmetic lives here, in one place, instead of
//! being re-derived per call site.

use chrono::{Days, NaiveDateTime, NaiveTime, Timelike};

use crate::models::ShiftDefinition;

/// Minutes in a day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Returns the number of minutes since midnight for a time-of-day.
pub fn minutes_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

/// Projects a time-of-day onto the instance (previous, same, or next day)
/// closest to a reference instant.
///
/// This is the canonical "project time-of-day onto date, accounting for
/// crossing midnight" operation: an overnight shift's 22:00 start seen from
/// a 00:30 punch resolves to 22:00 of the previous day, not 22:00 of the
/// punch's own date.
pub fn nearest_instant(time: NaiveTime, near: NaiveDateTime) -> NaiveDateTime {
    let date = near.date();
    let candidates = [
        date.checked_sub_days(Days::new(1)).map(|d| d.and_time(time)),
        Some(date.and_time(time)),
        date.checked_add_days(Days::new(1)).map(|d| d.and_time(time)),
    ];
    candidates
        .into_iter()
        .flatten()
        .min_by_key(|instant| (*instant - near).num_minutes().abs())
        .unwrap_or_else(|| date.and_time(time))
}

/// The concrete [start, end) window of a shift, anchored so that its start
/// is the instance nearest to the given reference instant. The end lands on
/// the following day for overnight shifts.
pub fn shift_window(shift: &ShiftDefinition, near: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let start = nearest_instant(shift.start_time, near);
    let end = start + chrono::Duration::minutes(shift.duration_minutes());
    (start, end)
}

/// Folds a minute distance onto the 24-hour wheel: distances beyond 12
/// hours are replaced by their 24-hour complement.
fn fold(distance: i64) -> i64 {
    let wrapped = distance.rem_euclid(MINUTES_PER_DAY);
    if wrapped > MINUTES_PER_DAY / 2 {
        MINUTES_PER_DAY - wrapped
    } else {
        wrapped
    }
}

/// Circular minute distance between two times-of-day.
pub fn wall_distance(a: NaiveTime, b: NaiveTime) -> i64 {
    fold((minutes_of_day(a) - minutes_of_day(b)).abs())
}

/// Minute distance from an IN punch to a candidate shift start.
///
/// The distance is measured against the start projected onto the punch's
/// own date; for late-evening starts (>= 20:00) seen from a before-noon
/// punch, the previous day's instance is also tried and the smaller
/// distance wins. Distances beyond 12 hours fold to their 24-hour
/// complement.
pub fn proximity_minutes(in_time: NaiveDateTime, start: NaiveTime) -> i64 {
    let same_day = in_time.date().and_time(start);
    let mut distance = (in_time - same_day).num_minutes().abs();

    if start.hour() >= 20 && in_time.hour() < 12 {
        if let Some(previous) = in_time.date().checked_sub_days(Days::new(1)) {
            let prior = (in_time - previous.and_time(start)).num_minutes().abs();
            distance = distance.min(prior);
        }
    }

    fold(distance)
}

/// Minutes of overlap between two instant intervals; zero when disjoint or
/// degenerate.
pub fn overlap_minutes(
    a: (NaiveDateTime, NaiveDateTime),
    b: (NaiveDateTime, NaiveDateTime),
) -> i64 {
    let start = a.0.max(b.0);
    let end = a.1.min(b.1);
    (end - start).num_minutes().max(0)
}
