//! Daily aggregation.
//!
//! Folds a day's segment records into one per-employee-per-date
//! [`DailyAttendanceAggregate`]. Aggregation is a pure fold: recomputation
//! from identical inputs yields an identical aggregate.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{DailyAttendanceAggregate, DayStatus, SegmentRecord};

/// Folds the day's segment records into the daily aggregate.
///
/// Hour and payable totals sum over resolved segments only (unresolved
/// segments have no expected-hours basis); `total_shifts` counts every
/// recorded segment. Overall status: no segments is absent; an open last
/// segment is partial; otherwise the payable total decides (≥ 1 present,
/// ≥ 0.5 half day, else absent).
pub fn aggregate_day(
    employee_id: &str,
    date: NaiveDate,
    segments: Vec<SegmentRecord>,
) -> DailyAttendanceAggregate {
    let mut total_working_hours = Decimal::ZERO;
    let mut total_ot_hours = Decimal::ZERO;
    let mut total_payable_shifts = Decimal::ZERO;

    for record in segments.iter().filter(|r| r.is_resolved()) {
        total_working_hours += record.adjusted_hours;
        total_ot_hours += record.extra_hours;
        total_payable_shifts += record.payable;
    }

    let status = if segments.is_empty() {
        DayStatus::Absent
    } else if segments.last().is_some_and(|r| r.out_time.is_none()) {
        DayStatus::Partial
    } else if total_payable_shifts >= Decimal::ONE {
        DayStatus::Present
    } else if total_payable_shifts >= Decimal::new(5, 1) {
        DayStatus::HalfDay
    } else {
        DayStatus::Absent
    };

    DailyAttendanceAggregate {
        employee_id: employee_id.to_string(),
        date,
        total_shifts: segments.len(),
        total_working_hours: total_working_hours.round_dp(2),
        total_ot_hours: total_ot_hours.round_dp(2),
        total_payable_shifts,
        status,
        segments,
    }
}
