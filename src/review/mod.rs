//! Manual resolution sink for confused shifts.
//!
//! Escalated segments land here as [`ConfusedShiftRecord`]s, upserted by
//! their (employee, date) key, and stay pending until a reviewer picks a
//! shift, the auto-nearest pick runs, or the record is dismissed.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{ConfusedShiftRecord, Resolution, ReviewEvent, ReviewStatus, ShiftCandidate};

/// The label recorded as reviewer for automatic resolutions.
pub const AUTO_REVIEWER: &str = "auto-nearest";

/// In-memory store of confused-shift records, unique per (employee, date).
#[derive(Debug, Clone, Default)]
pub struct ConfusedShiftStore {
    records: HashMap<(String, NaiveDate), ConfusedShiftRecord>,
}

impl ConfusedShiftStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an escalation for an (employee, date) key.
    ///
    /// A fresh key inserts a pending record; an existing pending record is
    /// refreshed in place (same ID, updated segment bounds and candidates).
    /// Terminal records are left untouched: a resolved key feeds its chosen
    /// shift back into the pipeline instead, and a dismissed key stays
    /// closed. Returns the record that now represents the key, or `None`
    /// when a dismissed record suppressed the escalation.
    pub fn note_escalation(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
        in_time: NaiveDateTime,
        out_time: Option<NaiveDateTime>,
        candidates: Vec<ShiftCandidate>,
    ) -> Option<&ConfusedShiftRecord> {
        use std::collections::hash_map::Entry;

        let key = (employee_id.to_string(), date);
        match self.records.entry(key) {
            Entry::Occupied(entry) => match entry.get().status {
                ReviewStatus::Pending => {
                    let record = entry.into_mut();
                    record.in_time = in_time;
                    record.out_time = out_time;
                    record.candidates = candidates;
                    Some(record)
                }
                ReviewStatus::Resolved => Some(entry.into_mut()),
                ReviewStatus::Dismissed => None,
            },
            Entry::Vacant(entry) => {
                let record = ConfusedShiftRecord {
                    id: Uuid::new_v4(),
                    employee_id: employee_id.to_string(),
                    date,
                    in_time,
                    out_time,
                    candidates,
                    status: ReviewStatus::Pending,
                    resolution: None,
                };
                info!(
                    record_id = %record.id,
                    employee_id,
                    %date,
                    "Confused shift escalated for manual review"
                );
                Some(entry.insert(record))
            }
        }
    }

    /// Looks up the record for an (employee, date) key.
    pub fn get(&self, employee_id: &str, date: NaiveDate) -> Option<&ConfusedShiftRecord> {
        self.records.get(&(employee_id.to_string(), date))
    }

    /// Looks up a record by its ID.
    pub fn get_by_id(&self, id: Uuid) -> Option<&ConfusedShiftRecord> {
        self.records.values().find(|r| r.id == id)
    }

    /// Returns all pending records, ordered by (employee, date).
    pub fn pending(&self) -> Vec<&ConfusedShiftRecord> {
        let mut pending: Vec<&ConfusedShiftRecord> = self
            .records
            .values()
            .filter(|r| r.status == ReviewStatus::Pending)
            .collect();
        pending.sort_by(|a, b| {
            a.employee_id
                .cmp(&b.employee_id)
                .then(a.date.cmp(&b.date))
        });
        pending
    }

    /// Resolves a pending record with the chosen shift.
    ///
    /// Rejects the transition when the record is not pending, or when the
    /// chosen shift is not among the recorded candidates.
    pub fn resolve(
        &mut self,
        id: Uuid,
        shift_id: &str,
        reviewer: &str,
        comments: Option<String>,
        automatic: bool,
    ) -> EngineResult<ConfusedShiftRecord> {
        let record = self
            .records
            .values_mut()
            .find(|r| r.id == id)
            .ok_or(EngineError::ReviewNotFound { id })?;

        if !record.candidates.iter().any(|c| c.shift_id == shift_id) {
            return Err(EngineError::ShiftNotFound {
                shift_id: shift_id.to_string(),
            });
        }

        let event = ReviewEvent::Resolve {
            shift_id: shift_id.to_string(),
            reviewer: reviewer.to_string(),
            comments: comments.clone(),
        };
        record.status = record.status.apply(id, &event)?;
        record.resolution = Some(Resolution {
            shift_id: Some(shift_id.to_string()),
            reviewer: reviewer.to_string(),
            comments,
            resolved_at: Utc::now(),
            automatic,
        });
        info!(
            record_id = %id,
            shift_id,
            reviewer,
            automatic,
            "Confused shift resolved"
        );
        Ok(record.clone())
    }

    /// Resolves a pending record with its nearest candidate (the
    /// auto-nearest pick).
    pub fn resolve_nearest(&mut self, id: Uuid) -> EngineResult<ConfusedShiftRecord> {
        let record = self
            .get_by_id(id)
            .ok_or(EngineError::ReviewNotFound { id })?;
        let nearest = record
            .nearest_candidate()
            .ok_or(EngineError::ReviewNotFound { id })?
            .shift_id
            .clone();
        self.resolve(id, &nearest, AUTO_REVIEWER, None, true)
    }

    /// Dismisses a pending record without choosing a shift.
    pub fn dismiss(
        &mut self,
        id: Uuid,
        reviewer: &str,
        comments: Option<String>,
    ) -> EngineResult<ConfusedShiftRecord> {
        let record = self
            .records
            .values_mut()
            .find(|r| r.id == id)
            .ok_or(EngineError::ReviewNotFound { id })?;

        let event = ReviewEvent::Dismiss {
            reviewer: reviewer.to_string(),
            comments: comments.clone(),
        };
        record.status = record.status.apply(id, &event)?;
        record.resolution = Some(Resolution {
            shift_id: None,
            reviewer: reviewer.to_string(),
            comments,
            resolved_at: Utc::now(),
            automatic: false,
        });
        info!(record_id = %id, reviewer, "Confused shift dismissed");
        Ok(record.clone())
    }
}
