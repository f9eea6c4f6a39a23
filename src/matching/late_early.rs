//! Late-in / early-out minute calculation.
//!
//! Pure functions used by the matcher and by manual resolution. Grace
//! precedence: explicit global override (if non-null) > shift-specific
//! grace > default 15.

use chrono::NaiveDateTime;

use crate::config::DEFAULT_GRACE_MINUTES;
use crate::models::ShiftDefinition;

use super::time_math::{nearest_instant, shift_window};

/// Resolves the effective grace minutes for a shift.
pub fn resolve_grace(global_override: Option<i64>, shift: &ShiftDefinition) -> i64 {
    global_override
        .or(shift.grace_minutes)
        .unwrap_or(DEFAULT_GRACE_MINUTES)
}

/// Minutes late past the grace window, floored at zero.
///
/// The shift start is projected onto the instance nearest the IN punch, so
/// an after-midnight arrival on an overnight shift measures against the
/// previous day's start.
pub fn late_in_minutes(
    in_time: NaiveDateTime,
    shift: &ShiftDefinition,
    global_override: Option<i64>,
) -> i64 {
    let start = nearest_instant(shift.start_time, in_time);
    let raw = (in_time - start).num_minutes();
    (raw - resolve_grace(global_override, shift)).max(0)
}

/// Minutes left early past the grace window, floored at zero; `None` when
/// the OUT punch is absent.
///
/// The shift end is projected onto the correct calendar date (a day is
/// added when end-of-day < start-of-day) before diffing. The window is
/// anchored on the segment's IN punch so both bounds agree on which night
/// an overnight shift belongs to.
pub fn early_out_minutes(
    in_time: NaiveDateTime,
    out_time: Option<NaiveDateTime>,
    shift: &ShiftDefinition,
    global_override: Option<i64>,
) -> Option<i64> {
    let out = out_time?;
    let (_, end) = shift_window(shift, in_time);
    let raw = (end - out).num_minutes();
    Some((raw - resolve_grace(global_override, shift)).max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rust_decimal::Decimal;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn make_shift(start: (u32, u32), end: (u32, u32), grace: Option<i64>) -> ShiftDefinition {
        ShiftDefinition {
            id: "shift_test".to_string(),
            name: "Test".to_string(),
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            expected_hours: Decimal::new(90, 1),
            grace_minutes: grace,
        }
    }

    // =========================================================================
    // LE-001 (Scenario A): 09:00-18:00 grace 15, IN 09:18 → 3 minutes late
    // =========================================================================
    #[test]
    fn test_le_001_late_past_shift_grace() {
        let shift = make_shift((9, 0), (18, 0), Some(15));
        let late = late_in_minutes(make_datetime("2026-03-02", "09:18:00"), &shift, None);
        assert_eq!(late, 3);
    }

    // =========================================================================
    // LE-002 (Scenario B): global override 20 beats shift grace
    // =========================================================================
    #[test]
    fn test_le_002_global_override_wins() {
        let shift = make_shift((9, 0), (18, 0), Some(15));

        let late = late_in_minutes(make_datetime("2026-03-02", "09:18:00"), &shift, Some(20));
        assert_eq!(late, 0);

        let late = late_in_minutes(make_datetime("2026-03-02", "09:25:00"), &shift, Some(20));
        assert_eq!(late, 5);
    }

    #[test]
    fn test_override_beats_even_larger_shift_grace() {
        let shift = make_shift((9, 0), (18, 0), Some(45));
        let late = late_in_minutes(make_datetime("2026-03-02", "09:30:00"), &shift, Some(10));
        assert_eq!(late, 20);
    }

    #[test]
    fn test_default_grace_when_nothing_configured() {
        let shift = make_shift((9, 0), (18, 0), None);
        let late = late_in_minutes(make_datetime("2026-03-02", "09:16:00"), &shift, None);
        assert_eq!(late, 1);
    }

    #[test]
    fn test_early_arrival_is_never_negative() {
        let shift = make_shift((9, 0), (18, 0), None);
        let late = late_in_minutes(make_datetime("2026-03-02", "08:30:00"), &shift, None);
        assert_eq!(late, 0);
    }

    #[test]
    fn test_early_out_past_grace() {
        let shift = make_shift((9, 0), (18, 0), Some(15));
        let early = early_out_minutes(
            make_datetime("2026-03-02", "09:00:00"),
            Some(make_datetime("2026-03-02", "17:30:00")),
            &shift,
            None,
        );
        assert_eq!(early, Some(15));
    }

    #[test]
    fn test_early_out_none_without_out_punch() {
        let shift = make_shift((9, 0), (18, 0), None);
        let early = early_out_minutes(make_datetime("2026-03-02", "09:00:00"), None, &shift, None);
        assert_eq!(early, None);
    }

    #[test]
    fn test_early_out_grace_reduces_before_flooring() {
        let shift = make_shift((9, 0), (18, 0), Some(15));
        let early = early_out_minutes(
            make_datetime("2026-03-02", "09:00:00"),
            Some(make_datetime("2026-03-02", "17:50:00")),
            &shift,
            None,
        );
        assert_eq!(early, Some(0));
    }

    // =========================================================================
    // LE-003: overnight 22:00-06:00, IN 22:10 OUT 05:50 → no deviations
    // =========================================================================
    #[test]
    fn test_le_003_overnight_shift_no_deviations() {
        let shift = make_shift((22, 0), (6, 0), None);
        let in_time = make_datetime("2026-03-02", "22:10:00");

        assert_eq!(late_in_minutes(in_time, &shift, None), 0);
        assert_eq!(
            early_out_minutes(
                in_time,
                Some(make_datetime("2026-03-03", "05:50:00")),
                &shift,
                None
            ),
            Some(0)
        );
    }

    #[test]
    fn test_overnight_late_arrival_after_midnight() {
        let shift = make_shift((22, 0), (6, 0), Some(15));
        // 02:30 arrival against yesterday's 22:00 start: 270 raw, 255 late.
        let late = late_in_minutes(make_datetime("2026-03-03", "02:30:00"), &shift, None);
        assert_eq!(late, 255);
    }

    #[test]
    fn test_overnight_early_out_projects_end_to_next_day() {
        let shift = make_shift((22, 0), (6, 0), Some(15));
        let early = early_out_minutes(
            make_datetime("2026-03-02", "22:00:00"),
            Some(make_datetime("2026-03-03", "04:00:00")),
            &shift,
            None,
        );
        // 06:00 next day minus 04:00 = 120, minus grace 15.
        assert_eq!(early, Some(105));
    }
}
