//! On-duty interval model.
//!
//! On-duty (OD) time is pre-approved off-site time counted as worked time.
//! The gap filler credits the portion of an approved OD interval that falls
//! inside the matched shift window but outside the punched span.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// The span an on-duty approval covers within its day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDutySpan {
    /// An explicit time-of-day window. Crosses midnight when `end < start`.
    Timed {
        /// Start time-of-day of the approval.
        start: NaiveTime,
        /// End time-of-day of the approval.
        end: NaiveTime,
    },
    /// The approval covers the assigned shift's whole window.
    FullDay,
    /// The approval covers the first half of the assigned shift's window.
    HalfDay,
}

/// A pre-approved off-site interval counted as worked time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnDutyInterval {
    /// The employee the approval belongs to.
    pub employee_id: String,
    /// The calendar date the approval applies to.
    pub date: NaiveDate,
    /// The span the approval covers.
    pub span: OnDutySpan,
    /// Whether the interval has been approved. Unapproved intervals are
    /// never credited.
    pub approved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_timed_interval() {
        let json = r#"{
            "employee_id": "emp_001",
            "date": "2026-03-02",
            "span": { "timed": { "start": "09:00:00", "end": "11:00:00" } },
            "approved": true
        }"#;

        let interval: OnDutyInterval = serde_json::from_str(json).unwrap();
        assert!(interval.approved);
        match interval.span {
            OnDutySpan::Timed { start, end } => {
                assert_eq!(start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
                assert_eq!(end, NaiveTime::from_hms_opt(11, 0, 0).unwrap());
            }
            other => panic!("Expected timed span, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_full_day_flag() {
        let json = r#"{
            "employee_id": "emp_001",
            "date": "2026-03-02",
            "span": "full_day",
            "approved": true
        }"#;

        let interval: OnDutyInterval = serde_json::from_str(json).unwrap();
        assert_eq!(interval.span, OnDutySpan::FullDay);
    }
}
