//! Work segment model.
//!
//! A [`WorkSegment`] is one contiguous IN→OUT span within a day, produced by
//! the segmenter. Segments within a day are non-overlapping and time-ordered;
//! only the chronologically last segment of a day may have no OUT yet.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Completion status of a work segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStatus {
    /// Both IN and OUT punches are present.
    Complete,
    /// One of the bounding punches is missing (an open segment, or an OUT
    /// that arrived with no prior IN).
    Incomplete,
}

/// One contiguous IN→OUT span within a day.
///
/// A segment's calendar date is the date of its IN punch even if its OUT
/// falls on the next date (overnight).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSegment {
    /// 1-based ordinal of the segment within its day.
    pub index: usize,
    /// The clock-in instant. Absent for a malformed segment whose OUT
    /// arrived with no prior IN; such segments are excluded from matching.
    pub in_time: Option<NaiveDateTime>,
    /// The clock-out instant, if the segment has been closed.
    pub out_time: Option<NaiveDateTime>,
    /// Hours between IN and OUT, rounded to 2 decimals. Zero while either
    /// bound is missing.
    pub punch_hours: Decimal,
    /// Whether both bounding punches are present.
    pub status: SegmentStatus,
}

impl WorkSegment {
    /// Builds a segment from its bounding punches, deriving hours and
    /// status.
    pub fn new(
        index: usize,
        in_time: Option<NaiveDateTime>,
        out_time: Option<NaiveDateTime>,
    ) -> Self {
        let punch_hours = match (in_time, out_time) {
            (Some(start), Some(end)) => hours_between(start, end),
            _ => Decimal::ZERO,
        };
        let status = if in_time.is_some() && out_time.is_some() {
            SegmentStatus::Complete
        } else {
            SegmentStatus::Incomplete
        };
        Self {
            index,
            in_time,
            out_time,
            punch_hours,
            status,
        }
    }

    /// The calendar date the segment belongs to: the date of its IN punch.
    pub fn date(&self) -> Option<NaiveDate> {
        self.in_time.map(|t| t.date())
    }

    /// Returns true if the segment can participate in shift matching.
    ///
    /// Segments with no IN time are excluded from matching but still
    /// counted in aggregation.
    pub fn is_matchable(&self) -> bool {
        self.in_time.is_some()
    }
}

/// Calculates the hours between two instants, rounded to 2 decimals.
pub fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    let minutes = (end - start).num_minutes();
    (Decimal::new(minutes, 0) / Decimal::new(60, 0)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    #[test]
    fn test_complete_segment_derives_hours() {
        let segment = WorkSegment::new(
            1,
            Some(make_datetime("2026-03-02", "09:00:00")),
            Some(make_datetime("2026-03-02", "18:00:00")),
        );

        assert_eq!(segment.status, SegmentStatus::Complete);
        assert_eq!(segment.punch_hours, Decimal::new(90, 1)); // 9.0
    }

    #[test]
    fn test_open_segment_has_zero_hours() {
        let segment = WorkSegment::new(1, Some(make_datetime("2026-03-02", "09:00:00")), None);

        assert_eq!(segment.status, SegmentStatus::Incomplete);
        assert_eq!(segment.punch_hours, Decimal::ZERO);
        assert!(segment.is_matchable());
    }

    #[test]
    fn test_segment_without_in_is_not_matchable() {
        let segment = WorkSegment::new(1, None, Some(make_datetime("2026-03-02", "18:00:00")));

        assert!(!segment.is_matchable());
        assert_eq!(segment.date(), None);
    }

    #[test]
    fn test_overnight_segment_date_is_in_date() {
        let segment = WorkSegment::new(
            1,
            Some(make_datetime("2026-03-02", "22:10:00")),
            Some(make_datetime("2026-03-03", "05:50:00")),
        );

        assert_eq!(
            segment.date(),
            Some(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap())
        );
        // 7 hours 40 minutes
        assert_eq!(segment.punch_hours, Decimal::new(767, 2));
    }

    #[test]
    fn test_hours_round_to_two_decimals() {
        // 100 minutes = 1.666... hours
        let hours = hours_between(
            make_datetime("2026-03-02", "09:00:00"),
            make_datetime("2026-03-02", "10:40:00"),
        );
        assert_eq!(hours, Decimal::new(167, 2));
    }
}
