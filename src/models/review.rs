//! Confused-shift record and review lifecycle.
//!
//! When the matcher cannot safely assign a shift to a segment, it escalates
//! by upserting a [`ConfusedShiftRecord`] keyed by (employee, date). The
//! record moves through an explicit state machine: pending → resolved (manual
//! pick or auto-nearest) or pending → dismissed. Both outcomes are terminal.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// One shift the matcher considered for an escalated segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftCandidate {
    /// The candidate shift's ID.
    pub shift_id: String,
    /// The candidate shift's name.
    pub name: String,
    /// The candidate's start time-of-day.
    pub start_time: NaiveTime,
    /// The candidate's end time-of-day.
    pub end_time: NaiveTime,
    /// Proximity of the segment's IN punch to the candidate's start, in
    /// minutes.
    pub distance_minutes: i64,
    /// Why the candidate could not be separated from the others.
    pub reason: String,
}

/// The lifecycle state of a confused-shift record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Awaiting a reviewer or the auto-nearest pick.
    Pending,
    /// A shift was chosen; terminal.
    Resolved,
    /// The record was closed without choosing a shift; terminal.
    Dismissed,
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewStatus::Pending => write!(f, "pending"),
            ReviewStatus::Resolved => write!(f, "resolved"),
            ReviewStatus::Dismissed => write!(f, "dismissed"),
        }
    }
}

/// A review action applied to a confused-shift record.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewEvent {
    /// Choose a shift for the escalated segment.
    Resolve {
        /// The chosen shift's ID.
        shift_id: String,
        /// Who resolved the record ("auto-nearest" for automatic picks).
        reviewer: String,
        /// Optional reviewer comments.
        comments: Option<String>,
    },
    /// Close the record without choosing a shift.
    Dismiss {
        /// Who dismissed the record.
        reviewer: String,
        /// Optional reviewer comments.
        comments: Option<String>,
    },
}

impl ReviewStatus {
    /// Applies a review event, returning the next status.
    ///
    /// Only pending records accept events; resolved and dismissed are
    /// terminal and re-resolving them is rejected as an invalid state.
    pub fn apply(self, id: Uuid, event: &ReviewEvent) -> EngineResult<ReviewStatus> {
        match (self, event) {
            (ReviewStatus::Pending, ReviewEvent::Resolve { .. }) => Ok(ReviewStatus::Resolved),
            (ReviewStatus::Pending, ReviewEvent::Dismiss { .. }) => Ok(ReviewStatus::Dismissed),
            (status, _) => Err(EngineError::InvalidReviewState {
                id,
                status: status.to_string(),
            }),
        }
    }
}

/// Metadata recorded when a review reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// The chosen shift, absent for dismissals.
    pub shift_id: Option<String>,
    /// Who closed the record.
    pub reviewer: String,
    /// Optional reviewer comments.
    pub comments: Option<String>,
    /// When the record was closed.
    pub resolved_at: DateTime<Utc>,
    /// True when the auto-nearest pick closed the record.
    pub automatic: bool,
}

/// A segment whose shift could not be auto-resolved; awaits human or
/// auto-nearest resolution.
///
/// Records are unique per (employee, date): escalation upserts, never
/// duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusedShiftRecord {
    /// Unique identifier of the record.
    pub id: Uuid,
    /// The employee the escalated segment belongs to.
    pub employee_id: String,
    /// The calendar date of the escalated segment.
    pub date: NaiveDate,
    /// The escalated segment's IN instant.
    pub in_time: NaiveDateTime,
    /// The escalated segment's OUT instant, if closed.
    pub out_time: Option<NaiveDateTime>,
    /// The candidates the matcher could not separate, with reasons.
    pub candidates: Vec<ShiftCandidate>,
    /// Current lifecycle state.
    pub status: ReviewStatus,
    /// Terminal-state metadata, present once resolved or dismissed.
    pub resolution: Option<Resolution>,
}

impl ConfusedShiftRecord {
    /// Returns the candidate nearest to the segment's IN punch, used by the
    /// auto-nearest pick.
    pub fn nearest_candidate(&self) -> Option<&ShiftCandidate> {
        self.candidates.iter().min_by_key(|c| c.distance_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_event() -> ReviewEvent {
        ReviewEvent::Resolve {
            shift_id: "shift_morning".to_string(),
            reviewer: "supervisor".to_string(),
            comments: None,
        }
    }

    #[test]
    fn test_pending_resolves() {
        let next = ReviewStatus::Pending
            .apply(Uuid::nil(), &resolve_event())
            .unwrap();
        assert_eq!(next, ReviewStatus::Resolved);
    }

    #[test]
    fn test_pending_dismisses() {
        let event = ReviewEvent::Dismiss {
            reviewer: "supervisor".to_string(),
            comments: Some("bad punch data".to_string()),
        };
        let next = ReviewStatus::Pending.apply(Uuid::nil(), &event).unwrap();
        assert_eq!(next, ReviewStatus::Dismissed);
    }

    #[test]
    fn test_terminal_states_reject_events() {
        for terminal in [ReviewStatus::Resolved, ReviewStatus::Dismissed] {
            let result = terminal.apply(Uuid::nil(), &resolve_event());
            match result {
                Err(EngineError::InvalidReviewState { status, .. }) => {
                    assert_eq!(status, terminal.to_string());
                }
                other => panic!("Expected InvalidReviewState, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_nearest_candidate_picks_smallest_distance() {
        let record = ConfusedShiftRecord {
            id: Uuid::nil(),
            employee_id: "emp_001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            in_time: NaiveDateTime::parse_from_str("2026-03-02 08:40:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            out_time: None,
            candidates: vec![
                ShiftCandidate {
                    shift_id: "shift_early".to_string(),
                    name: "Early".to_string(),
                    start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                    end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                    distance_minutes: 40,
                    reason: "within 30 min of nearest alternative".to_string(),
                },
                ShiftCandidate {
                    shift_id: "shift_morning".to_string(),
                    name: "Morning".to_string(),
                    start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                    end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                    distance_minutes: 20,
                    reason: "within 30 min of nearest alternative".to_string(),
                },
            ],
            status: ReviewStatus::Pending,
            resolution: None,
        };

        assert_eq!(record.nearest_candidate().unwrap().shift_id, "shift_morning");
    }
}
