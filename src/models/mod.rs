//! Core data models for the Attendance Reconciliation Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod on_duty;
mod punch;
mod review;
mod segment;
mod shift;

pub use attendance::{DailyAttendanceAggregate, DayStatus, MatchMethod, SegmentRecord, SegmentStanding};
pub use on_duty::{OnDutyInterval, OnDutySpan};
pub use punch::{Punch, PunchDirection};
pub use review::{ConfusedShiftRecord, Resolution, ReviewEvent, ReviewStatus, ShiftCandidate};
pub use segment::{SegmentStatus, WorkSegment};
pub use shift::ShiftDefinition;
