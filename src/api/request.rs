//! Request types for the Attendance Reconciliation Engine API.
//!
//! This module defines the JSON request structures for the processing and
//! review endpoints.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{Punch, PunchDirection};

/// Request body for the `/attendance/process` endpoint: one (employee,
/// date) unit's punch list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    /// The employee the punches belong to.
    pub employee_id: String,
    /// The calendar date of the unit.
    pub date: NaiveDate,
    /// The day's punches (order does not matter; the engine sorts).
    pub punches: Vec<PunchRequest>,
}

/// A punch in a processing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchRequest {
    /// The instant the punch was recorded.
    pub timestamp: NaiveDateTime,
    /// Whether this is a clock-in or clock-out.
    pub direction: PunchDirection,
    /// Tag identifying the capture source.
    #[serde(default)]
    pub source: String,
}

impl ProcessRequest {
    /// Converts the request's punches into domain punches tagged with the
    /// unit's employee ID.
    pub fn domain_punches(&self) -> Vec<Punch> {
        self.punches
            .iter()
            .map(|p| Punch {
                employee_id: self.employee_id.clone(),
                timestamp: p.timestamp,
                direction: p.direction,
                source: p.source.clone(),
            })
            .collect()
    }
}

/// Request body for the `/reviews/:id/resolve` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    /// The chosen shift's ID.
    pub shift_id: String,
    /// Who is resolving the record.
    pub reviewer: String,
    /// Optional reviewer comments.
    #[serde(default)]
    pub comments: Option<String>,
}

/// Request body for the `/reviews/:id/dismiss` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DismissRequest {
    /// Who is dismissing the record.
    pub reviewer: String,
    /// Optional reviewer comments.
    #[serde(default)]
    pub comments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_process_request() {
        let json = r#"{
            "employee_id": "emp_001",
            "date": "2026-03-02",
            "punches": [
                { "timestamp": "2026-03-02T09:05:00", "direction": "in", "source": "biometric" },
                { "timestamp": "2026-03-02T18:02:00", "direction": "out" }
            ]
        }"#;

        let request: ProcessRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.employee_id, "emp_001");
        assert_eq!(request.punches.len(), 2);

        let punches = request.domain_punches();
        assert_eq!(punches[0].employee_id, "emp_001");
        assert_eq!(punches[0].direction, PunchDirection::In);
        assert_eq!(punches[1].source, "");
    }

    #[test]
    fn test_deserialize_resolve_request_without_comments() {
        let json = r#"{ "shift_id": "shift_morning", "reviewer": "supervisor" }"#;
        let request: ResolveRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.shift_id, "shift_morning");
        assert_eq!(request.comments, None);
    }
}
