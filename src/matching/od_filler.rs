//! On-duty gap filling.
//!
//! Credits the portion of each approved OD interval that falls inside the
//! matched shift window but outside the punched span, waives late/early
//! penalties fully covered by an approval, and classifies the segment
//! against its expected hours.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::models::{OnDutyInterval, OnDutySpan, SegmentStanding, ShiftDefinition, WorkSegment};

use super::time_math::{nearest_instant, overlap_minutes, shift_window};

/// Adjusted working hours ≥ 90% of expected is present.
const PRESENT_THRESHOLD: Decimal = Decimal::from_parts(9, 0, 0, false, 1);

/// Adjusted working hours ≥ 45% of expected is a half day.
const HALF_DAY_THRESHOLD: Decimal = Decimal::from_parts(45, 0, 0, false, 2);

/// The result of reconciling a matched segment against its approved OD
/// intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct OnDutyAdjustment {
    /// On-duty hours credited (the gap between OD-in-shift and
    /// OD-in-punch), rounded to 2 decimals.
    pub od_hours: Decimal,
    /// Punch hours plus credited on-duty hours.
    pub adjusted_hours: Decimal,
    /// Hours beyond the expected duration, rounded to 2 decimals.
    pub extra_hours: Decimal,
    /// True when some approval fully covers [shift start, punch in).
    pub late_waived: bool,
    /// True when some approval fully covers (punch out, shift end].
    pub early_waived: bool,
    /// Attendance classification against the expected hours.
    pub standing: SegmentStanding,
    /// The payable shift fraction for the standing.
    pub payable: Decimal,
}

/// Reconciles a matched segment against the day's approved OD intervals.
///
/// For each approved interval: `gap = max(0, odInShift − odInPunch)`
/// minutes, summed across intervals and converted to hours. Unapproved
/// intervals are ignored. Full/half-day flags resolve against the assigned
/// shift's window (whole window, or its first half).
pub fn reconcile_on_duty(
    segment: &WorkSegment,
    shift: &ShiftDefinition,
    intervals: &[OnDutyInterval],
) -> OnDutyAdjustment {
    let Some(in_time) = segment.in_time else {
        return no_adjustment(segment, shift);
    };

    let window = shift_window(shift, in_time);
    let punch_span = segment.out_time.map(|out| (in_time, out));

    let mut gap_minutes: i64 = 0;
    let mut late_waived = false;
    let mut early_waived = false;

    for interval in intervals.iter().filter(|i| i.approved) {
        let Some(od) = resolve_span(interval, window, in_time) else {
            continue;
        };

        let od_in_shift = overlap_minutes(od, window);
        let od_in_punch = punch_span.map_or(0, |span| overlap_minutes(od, span));
        gap_minutes += (od_in_shift - od_in_punch).max(0);

        if od.0 <= window.0 && od.1 >= in_time {
            late_waived = true;
        }
        if let Some(out) = segment.out_time {
            if od.0 <= out && od.1 >= window.1 {
                early_waived = true;
            }
        }
    }

    let od_hours = (Decimal::new(gap_minutes, 0) / Decimal::new(60, 0)).round_dp(2);
    let adjusted_hours = (segment.punch_hours + od_hours).round_dp(2);
    let extra_hours = (adjusted_hours - shift.expected_hours).max(Decimal::ZERO).round_dp(2);
    let standing = classify(adjusted_hours, shift.expected_hours);

    OnDutyAdjustment {
        od_hours,
        adjusted_hours,
        extra_hours,
        late_waived,
        early_waived,
        standing,
        payable: standing.payable(),
    }
}

fn no_adjustment(segment: &WorkSegment, shift: &ShiftDefinition) -> OnDutyAdjustment {
    let standing = classify(segment.punch_hours, shift.expected_hours);
    OnDutyAdjustment {
        od_hours: Decimal::ZERO,
        adjusted_hours: segment.punch_hours,
        extra_hours: Decimal::ZERO,
        late_waived: false,
        early_waived: false,
        standing,
        payable: standing.payable(),
    }
}

/// Resolves an OD span to concrete instants against the shift window.
///
/// Timed spans anchor on the segment's IN punch so overnight approvals land
/// on the same night as the shift; a timed span with end < start crosses
/// midnight.
fn resolve_span(
    interval: &OnDutyInterval,
    window: (NaiveDateTime, NaiveDateTime),
    in_time: NaiveDateTime,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    match interval.span {
        OnDutySpan::Timed { start, end } => {
            let od_start = nearest_instant(start, in_time);
            let mut od_end = od_start.date().and_time(end);
            if od_end <= od_start {
                od_end = od_end + chrono::Duration::days(1);
            }
            Some((od_start, od_end))
        }
        OnDutySpan::FullDay => Some(window),
        OnDutySpan::HalfDay => {
            let half = (window.1 - window.0) / 2;
            Some((window.0, window.0 + half))
        }
    }
}

/// Classifies adjusted hours against expected hours.
fn classify(adjusted: Decimal, expected: Decimal) -> SegmentStanding {
    if adjusted >= PRESENT_THRESHOLD * expected {
        SegmentStanding::Present
    } else if adjusted >= HALF_DAY_THRESHOLD * expected {
        SegmentStanding::HalfDay
    } else {
        SegmentStanding::Absent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn make_shift(start: (u32, u32), end: (u32, u32), expected: Decimal) -> ShiftDefinition {
        ShiftDefinition {
            id: "shift_morning".to_string(),
            name: "Morning".to_string(),
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            expected_hours: expected,
            grace_minutes: None,
        }
    }

    fn segment(in_time: &str, out_time: Option<&str>) -> WorkSegment {
        WorkSegment::new(
            1,
            Some(NaiveDateTime::parse_from_str(in_time, "%Y-%m-%d %H:%M:%S").unwrap()),
            out_time.map(|t| NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S").unwrap()),
        )
    }

    fn timed_od(start: (u32, u32), end: (u32, u32), approved: bool) -> OnDutyInterval {
        OnDutyInterval {
            employee_id: "emp_001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            span: OnDutySpan::Timed {
                start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
                end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            },
            approved,
        }
    }

    // =========================================================================
    // OD-001 (Scenario D): morning OD fills the punch gap and waives lateness
    // =========================================================================
    #[test]
    fn test_od_001_gap_credited_and_late_waived() {
        let shift = make_shift((9, 0), (18, 0), Decimal::new(90, 1));
        let seg = segment("2026-03-02 11:00:00", Some("2026-03-02 18:00:00"));
        let ods = vec![timed_od((9, 0), (11, 0), true)];

        let adjustment = reconcile_on_duty(&seg, &shift, &ods);
        assert_eq!(adjustment.od_hours, Decimal::new(200, 2)); // 2.00
        assert_eq!(adjustment.adjusted_hours, Decimal::new(900, 2)); // 7 + 2
        assert!(adjustment.late_waived);
        assert!(!adjustment.early_waived);
        assert_eq!(adjustment.standing, SegmentStanding::Present);
        assert_eq!(adjustment.payable, Decimal::ONE);
    }

    #[test]
    fn test_unapproved_interval_is_ignored() {
        let shift = make_shift((9, 0), (18, 0), Decimal::new(90, 1));
        let seg = segment("2026-03-02 11:00:00", Some("2026-03-02 18:00:00"));
        let ods = vec![timed_od((9, 0), (11, 0), false)];

        let adjustment = reconcile_on_duty(&seg, &shift, &ods);
        assert_eq!(adjustment.od_hours, Decimal::ZERO);
        assert!(!adjustment.late_waived);
    }

    #[test]
    fn test_od_overlapping_punch_span_is_not_double_counted() {
        let shift = make_shift((9, 0), (18, 0), Decimal::new(90, 1));
        // Punched 09:00-18:00; a 10:00-12:00 OD sits entirely inside the
        // punch span, so the gap is zero.
        let seg = segment("2026-03-02 09:00:00", Some("2026-03-02 18:00:00"));
        let ods = vec![timed_od((10, 0), (12, 0), true)];

        let adjustment = reconcile_on_duty(&seg, &shift, &ods);
        assert_eq!(adjustment.od_hours, Decimal::ZERO);
        assert_eq!(adjustment.adjusted_hours, Decimal::new(900, 2));
    }

    #[test]
    fn test_od_outside_shift_window_earns_nothing() {
        let shift = make_shift((9, 0), (18, 0), Decimal::new(90, 1));
        let seg = segment("2026-03-02 09:00:00", Some("2026-03-02 18:00:00"));
        let ods = vec![timed_od((19, 0), (21, 0), true)];

        let adjustment = reconcile_on_duty(&seg, &shift, &ods);
        assert_eq!(adjustment.od_hours, Decimal::ZERO);
    }

    #[test]
    fn test_early_out_waived_when_od_covers_tail() {
        let shift = make_shift((9, 0), (18, 0), Decimal::new(90, 1));
        let seg = segment("2026-03-02 09:00:00", Some("2026-03-02 15:00:00"));
        let ods = vec![timed_od((15, 0), (18, 0), true)];

        let adjustment = reconcile_on_duty(&seg, &shift, &ods);
        assert_eq!(adjustment.od_hours, Decimal::new(300, 2)); // 3.00
        assert!(adjustment.early_waived);
        assert!(!adjustment.late_waived);
        assert_eq!(adjustment.standing, SegmentStanding::Present);
    }

    #[test]
    fn test_partial_tail_cover_does_not_waive() {
        let shift = make_shift((9, 0), (18, 0), Decimal::new(90, 1));
        let seg = segment("2026-03-02 09:00:00", Some("2026-03-02 15:00:00"));
        // Covers 15:00-17:00 but not up to shift end.
        let ods = vec![timed_od((15, 0), (17, 0), true)];

        let adjustment = reconcile_on_duty(&seg, &shift, &ods);
        assert!(!adjustment.early_waived);
        assert_eq!(adjustment.od_hours, Decimal::new(200, 2));
    }

    #[test]
    fn test_multiple_ods_sum_their_gaps() {
        let shift = make_shift((9, 0), (18, 0), Decimal::new(90, 1));
        let seg = segment("2026-03-02 10:00:00", Some("2026-03-02 17:00:00"));
        let ods = vec![timed_od((9, 0), (10, 0), true), timed_od((17, 0), (18, 0), true)];

        let adjustment = reconcile_on_duty(&seg, &shift, &ods);
        assert_eq!(adjustment.od_hours, Decimal::new(200, 2));
        assert!(adjustment.late_waived);
        assert!(adjustment.early_waived);
    }

    #[test]
    fn test_full_day_flag_covers_whole_window() {
        let shift = make_shift((9, 0), (18, 0), Decimal::new(90, 1));
        let seg = segment("2026-03-02 09:00:00", None);
        let ods = vec![OnDutyInterval {
            employee_id: "emp_001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            span: OnDutySpan::FullDay,
            approved: true,
        }];

        let adjustment = reconcile_on_duty(&seg, &shift, &ods);
        assert_eq!(adjustment.od_hours, Decimal::new(900, 2));
        assert_eq!(adjustment.standing, SegmentStanding::Present);
    }

    #[test]
    fn test_half_day_flag_covers_first_half() {
        let shift = make_shift((9, 0), (17, 0), Decimal::new(80, 1));
        // No punch overlap with the first half at all.
        let seg = segment("2026-03-02 13:00:00", Some("2026-03-02 17:00:00"));
        let ods = vec![OnDutyInterval {
            employee_id: "emp_001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            span: OnDutySpan::HalfDay,
            approved: true,
        }];

        let adjustment = reconcile_on_duty(&seg, &shift, &ods);
        assert_eq!(adjustment.od_hours, Decimal::new(400, 2));
        assert_eq!(adjustment.adjusted_hours, Decimal::new(800, 2));
        assert!(adjustment.late_waived);
    }

    #[test]
    fn test_extra_hours_beyond_expected() {
        let shift = make_shift((9, 0), (18, 0), Decimal::new(80, 1)); // 8h expected
        let seg = segment("2026-03-02 09:00:00", Some("2026-03-02 19:00:00"));

        let adjustment = reconcile_on_duty(&seg, &shift, &[]);
        assert_eq!(adjustment.extra_hours, Decimal::new(200, 2)); // 10 - 8
        assert_eq!(adjustment.standing, SegmentStanding::Present);
    }

    #[test]
    fn test_standing_thresholds() {
        let shift = make_shift((9, 0), (19, 0), Decimal::new(100, 1)); // 10h expected

        // 9h punched = 90% → present.
        let present = reconcile_on_duty(
            &segment("2026-03-02 09:00:00", Some("2026-03-02 18:00:00")),
            &shift,
            &[],
        );
        assert_eq!(present.standing, SegmentStanding::Present);

        // 5h punched = 50% → half day.
        let half = reconcile_on_duty(
            &segment("2026-03-02 09:00:00", Some("2026-03-02 14:00:00")),
            &shift,
            &[],
        );
        assert_eq!(half.standing, SegmentStanding::HalfDay);
        assert_eq!(half.payable, Decimal::new(5, 1));

        // 4h punched = 40% → absent.
        let absent = reconcile_on_duty(
            &segment("2026-03-02 09:00:00", Some("2026-03-02 13:00:00")),
            &shift,
            &[],
        );
        assert_eq!(absent.standing, SegmentStanding::Absent);
        assert_eq!(absent.payable, Decimal::ZERO);
    }

    #[test]
    fn test_overnight_shift_od_lands_on_shift_night() {
        let shift = ShiftDefinition {
            id: "shift_night".to_string(),
            name: "Night".to_string(),
            start_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            expected_hours: Decimal::new(80, 1),
            grace_minutes: None,
        };
        // Punched in two hours late; OD approved for 22:00-00:00.
        let seg = segment("2026-03-03 00:00:00", Some("2026-03-03 06:00:00"));
        let ods = vec![timed_od((22, 0), (0, 0), true)];

        let adjustment = reconcile_on_duty(&seg, &shift, &ods);
        assert_eq!(adjustment.od_hours, Decimal::new(200, 2));
        assert_eq!(adjustment.adjusted_hours, Decimal::new(800, 2));
        assert!(adjustment.late_waived);
    }
}
