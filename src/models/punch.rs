//! Punch model and related types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The direction of a clock punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchDirection {
    /// A clock-in event.
    In,
    /// A clock-out event.
    Out,
}

/// A single clock-in/out event from a time-recording source.
///
/// The engine assumes the direction has already been tagged by the upstream
/// capture system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Punch {
    /// Identifier of the employee who punched.
    pub employee_id: String,
    /// The instant the punch was recorded.
    pub timestamp: NaiveDateTime,
    /// Whether this is a clock-in or clock-out.
    pub direction: PunchDirection,
    /// Tag identifying the capture source (e.g., "biometric", "mobile").
    #[serde(default)]
    pub source: String,
}

impl Punch {
    /// Returns true if this is a clock-in punch.
    pub fn is_in(&self) -> bool {
        self.direction == PunchDirection::In
    }

    /// Returns true if this is a clock-out punch.
    pub fn is_out(&self) -> bool {
        self.direction == PunchDirection::Out
    }
}
