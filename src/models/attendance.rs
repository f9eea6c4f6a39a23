//! Daily attendance aggregate models.
//!
//! This module contains the per-segment record and the
//! [`DailyAttendanceAggregate`] that folds a day's resolved segments into a
//! single per-employee-per-date row with late/early/overtime metrics.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::WorkSegment;

/// How a segment's shift assignment was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// A pre-scheduled shift short-circuited proximity matching.
    PreScheduled,
    /// Exactly one candidate survived the tolerance filter.
    Single,
    /// No candidate was within tolerance; the globally nearest was taken.
    NearestFallback,
    /// The nearest candidate won a non-ambiguous proximity ranking.
    ProximityClosest,
    /// Candidates were separated by the weighted out-time score.
    OutTimeDisambiguated,
    /// A reviewer (or the auto-nearest pick) resolved the assignment.
    Manual,
}

/// Per-segment attendance classification.
///
/// Derived from adjusted working hours against the shift's expected hours:
/// ≥ 90% is present, ≥ 45% is a half day, anything less is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStanding {
    /// Worked at least 90% of the expected hours (payable 1.0).
    Present,
    /// Worked at least 45% of the expected hours (payable 0.5).
    HalfDay,
    /// Worked less than 45% of the expected hours (payable 0).
    Absent,
}

impl SegmentStanding {
    /// The payable shift fraction for this standing.
    pub fn payable(self) -> Decimal {
        match self {
            SegmentStanding::Present => Decimal::ONE,
            SegmentStanding::HalfDay => Decimal::new(5, 1),
            SegmentStanding::Absent => Decimal::ZERO,
        }
    }
}

/// Overall status of a day's attendance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// Total payable shifts reached 1.0.
    Present,
    /// The last segment of the day is still open (no OUT yet).
    Partial,
    /// Total payable shifts reached 0.5.
    HalfDay,
    /// No segments, or total payable shifts below 0.5.
    Absent,
}

/// One work segment with its resolved shift assignment and metrics.
///
/// Segments that could not be assigned (empty catalog, pending or dismissed
/// review) carry `shift_id = None` and contribute punch hours only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// 1-based ordinal of the segment within its day.
    pub index: usize,
    /// The clock-in instant, if present.
    pub in_time: Option<NaiveDateTime>,
    /// The clock-out instant, if present.
    pub out_time: Option<NaiveDateTime>,
    /// The assigned shift, if the segment was resolved.
    pub shift_id: Option<String>,
    /// How the assignment was decided, if resolved.
    pub method: Option<MatchMethod>,
    /// The assigned shift's expected hours, if resolved.
    pub expected_hours: Option<Decimal>,
    /// Minutes late past the grace window, if resolved.
    pub late_in_minutes: Option<i64>,
    /// Minutes left early past the grace window, if resolved and closed.
    pub early_out_minutes: Option<i64>,
    /// Whether an on-duty approval waived the late arrival.
    pub late_waived: bool,
    /// Whether an on-duty approval waived the early departure.
    pub early_waived: bool,
    /// Hours between IN and OUT, rounded to 2 decimals.
    pub punch_hours: Decimal,
    /// On-duty hours credited to this segment.
    pub od_hours: Decimal,
    /// Punch hours plus credited on-duty hours.
    pub adjusted_hours: Decimal,
    /// Hours worked beyond the expected duration.
    pub extra_hours: Decimal,
    /// Attendance classification, if resolved.
    pub standing: Option<SegmentStanding>,
    /// Payable shift fraction (0, 0.5, or 1.0; 0 while unresolved).
    pub payable: Decimal,
}

impl SegmentRecord {
    /// Builds an unassigned record for a segment that could not be matched
    /// (or is excluded from matching). Punch hours are carried; all
    /// shift-dependent metrics stay empty.
    pub fn unassigned(segment: &WorkSegment) -> Self {
        Self {
            index: segment.index,
            in_time: segment.in_time,
            out_time: segment.out_time,
            shift_id: None,
            method: None,
            expected_hours: None,
            late_in_minutes: None,
            early_out_minutes: None,
            late_waived: false,
            early_waived: false,
            punch_hours: segment.punch_hours,
            od_hours: Decimal::ZERO,
            adjusted_hours: segment.punch_hours,
            extra_hours: Decimal::ZERO,
            standing: None,
            payable: Decimal::ZERO,
        }
    }

    /// Returns true if the segment has a shift assignment.
    pub fn is_resolved(&self) -> bool {
        self.shift_id.is_some()
    }

    /// Returns true if the segment counts as a late arrival (late minutes
    /// above zero and not waived by an on-duty approval).
    pub fn is_late_in(&self) -> bool {
        !self.late_waived && self.late_in_minutes.is_some_and(|m| m > 0)
    }

    /// Returns true if the segment counts as an early departure.
    pub fn is_early_out(&self) -> bool {
        !self.early_waived && self.early_out_minutes.is_some_and(|m| m > 0)
    }
}

/// The per-employee-per-date attendance row.
///
/// Recomputed deterministically from source punches and upserted by
/// (employee, date); reprocessing identical inputs yields an identical
/// aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAttendanceAggregate {
    /// The employee the row belongs to.
    pub employee_id: String,
    /// The calendar date of the row.
    pub date: NaiveDate,
    /// The day's segments, time-ordered.
    pub segments: Vec<SegmentRecord>,
    /// Number of segments recorded for the day.
    pub total_shifts: usize,
    /// Sum of adjusted working hours across resolved segments.
    pub total_working_hours: Decimal,
    /// Sum of extra (overtime) hours across resolved segments.
    pub total_ot_hours: Decimal,
    /// Sum of payable shift fractions.
    pub total_payable_shifts: Decimal,
    /// Overall status of the day.
    pub status: DayStatus,
}
