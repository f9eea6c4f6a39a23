//! Matching and reconciliation logic for the Attendance Reconciliation
//! Engine.
//!
//! This module contains the calculation pipeline: canonical
//! midnight-crossing time arithmetic, the duplicate-IN / continuation
//! filter, punch segmentation, shift matching with ambiguity escalation,
//! late-in/early-out calculation, on-duty gap filling, and daily
//! aggregation.

mod aggregate;
mod duplicate_filter;
mod late_early;
mod matcher;
mod od_filler;
mod segmenter;
mod time_math;

pub use aggregate::aggregate_day;
pub use duplicate_filter::{DuplicateInAction, classify_duplicate_in};
pub use late_early::{early_out_minutes, late_in_minutes, resolve_grace};
pub use matcher::{MatchOutcome, MatchResult, match_segment, nearest_by_proximity};
pub use od_filler::{OnDutyAdjustment, reconcile_on_duty};
pub use segmenter::segment_punches;
pub use time_math::{
    MINUTES_PER_DAY, minutes_of_day, nearest_instant, overlap_minutes, proximity_minutes,
    shift_window, wall_distance,
};
