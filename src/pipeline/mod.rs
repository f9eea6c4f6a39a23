//! Processing pipeline for the Attendance Reconciliation Engine.
//!
//! One unit of work is a (employee, date) pair: punches are segmented,
//! segments matched (consulting the review store for prior resolutions),
//! on-duty intervals reconciled, and the result folded into the daily
//! aggregate. Processing is deterministic per unit; writes are upserts
//! keyed by (employee, date), so reprocessing a unit is always safe.
//!
//! External reads (catalog, OD) that fail abort only the current unit —
//! nothing is written — and the error is reported as retryable.

mod sources;

pub use sources::{OnDutyLedger, OnDutySource};

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::CatalogSource;
use crate::config::EngineSettings;
use crate::error::{EngineError, EngineResult};
use crate::matching::{
    MatchOutcome, MatchResult, aggregate_day, match_segment, proximity_minutes, reconcile_on_duty,
    segment_punches,
};
use crate::models::{
    ConfusedShiftRecord, DailyAttendanceAggregate, MatchMethod, OnDutyInterval, Punch,
    ReviewStatus, SegmentRecord, ShiftCandidate, ShiftDefinition, WorkSegment,
};
use crate::review::ConfusedShiftStore;

/// The result of processing one (employee, date) unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    /// The recomputed daily aggregate.
    pub aggregate: DailyAttendanceAggregate,
    /// The confused-shift record tied to this unit: the escalation this run
    /// raised (or refreshed), or the resolved record whose chosen shift
    /// informed the run. Absent when nothing escalated, or when a dismissed
    /// record suppressed re-escalation.
    pub confused: Option<ConfusedShiftRecord>,
}

/// In-memory upsert store of daily aggregates, keyed by (employee, date).
#[derive(Debug, Clone, Default)]
pub struct AggregateStore {
    rows: HashMap<(String, NaiveDate), DailyAttendanceAggregate>,
}

impl AggregateStore {
    /// Upserts an aggregate under its (employee, date) key.
    pub fn upsert(&mut self, aggregate: DailyAttendanceAggregate) {
        self.rows.insert(
            (aggregate.employee_id.clone(), aggregate.date),
            aggregate,
        );
    }

    /// Looks up the aggregate for an (employee, date) key.
    pub fn get(&self, employee_id: &str, date: NaiveDate) -> Option<&DailyAttendanceAggregate> {
        self.rows.get(&(employee_id.to_string(), date))
    }

    /// The number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when no rows are stored.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Escalation payload carried from matching to the commit phase.
struct Escalation {
    in_time: NaiveDateTime,
    out_time: Option<NaiveDateTime>,
    candidates: Vec<ShiftCandidate>,
}

/// The attendance engine: wires the catalog and OD sources, the review
/// store, and the aggregate store around the matching pipeline.
///
/// All mutation happens through upserts keyed by (employee, date); the unit
/// computation itself is deterministic, so reprocessing on any trigger (new
/// punch, OD change, manual resolution) is re-entrant.
#[derive(Debug)]
pub struct AttendanceEngine<C: CatalogSource, O: OnDutySource> {
    catalog: C,
    on_duty: O,
    settings: EngineSettings,
    aggregates: AggregateStore,
    reviews: ConfusedShiftStore,
    punch_journal: HashMap<(String, NaiveDate), Vec<Punch>>,
}

impl<C: CatalogSource, O: OnDutySource> AttendanceEngine<C, O> {
    /// Creates an engine over the given sources and settings.
    pub fn new(catalog: C, on_duty: O, settings: EngineSettings) -> Self {
        Self {
            catalog,
            on_duty,
            settings,
            aggregates: AggregateStore::default(),
            reviews: ConfusedShiftStore::new(),
            punch_journal: HashMap::new(),
        }
    }

    /// Returns the engine's settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Looks up the stored aggregate for an (employee, date) key.
    pub fn aggregate(&self, employee_id: &str, date: NaiveDate) -> Option<&DailyAttendanceAggregate> {
        self.aggregates.get(employee_id, date)
    }

    /// Returns all pending confused-shift records.
    pub fn pending_reviews(&self) -> Vec<&ConfusedShiftRecord> {
        self.reviews.pending()
    }

    /// Looks up a confused-shift record by ID.
    pub fn review(&self, id: Uuid) -> Option<&ConfusedShiftRecord> {
        self.reviews.get_by_id(id)
    }

    /// Processes one (employee, date) unit from its punch list.
    ///
    /// The unit is computed fully before anything is written: a failed
    /// external read aborts with no partial state. On success the aggregate
    /// is upserted, the punches journaled for later reprocessing, and any
    /// escalation upserted into the review store.
    pub fn process_day(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
        punches: Vec<Punch>,
    ) -> EngineResult<ProcessOutcome> {
        let (aggregate, escalation) = self.run_unit(employee_id, date, &punches)?;

        self.punch_journal
            .insert((employee_id.to_string(), date), punches);

        let confused = match escalation {
            Some(esc) => self
                .reviews
                .note_escalation(employee_id, date, esc.in_time, esc.out_time, esc.candidates)
                .cloned(),
            None => self
                .reviews
                .get(employee_id, date)
                .filter(|r| r.status == ReviewStatus::Resolved)
                .cloned(),
        };

        info!(
            employee_id,
            %date,
            segments = aggregate.total_shifts,
            status = ?aggregate.status,
            escalated = confused.as_ref().is_some_and(|r| r.status == ReviewStatus::Pending),
            "Attendance unit processed"
        );
        self.aggregates.upsert(aggregate.clone());

        Ok(ProcessOutcome { aggregate, confused })
    }

    /// Reprocesses a unit from its journaled punches (used when an OD
    /// approval changes or a review reaches a terminal state).
    pub fn reprocess(&mut self, employee_id: &str, date: NaiveDate) -> EngineResult<ProcessOutcome> {
        let punches = self
            .punch_journal
            .get(&(employee_id.to_string(), date))
            .cloned()
            .ok_or_else(|| EngineError::PunchHistoryMissing {
                employee_id: employee_id.to_string(),
                date,
            })?;
        self.process_day(employee_id, date, punches)
    }

    /// Resolves a pending confused-shift record with the chosen shift, then
    /// re-runs the unit so the aggregate reflects the choice.
    pub fn resolve_review(
        &mut self,
        id: Uuid,
        shift_id: &str,
        reviewer: &str,
        comments: Option<String>,
    ) -> EngineResult<ProcessOutcome> {
        let record = self.reviews.resolve(id, shift_id, reviewer, comments, false)?;
        self.reprocess(&record.employee_id, record.date)
    }

    /// Resolves a pending record with its nearest candidate, then re-runs
    /// the unit.
    pub fn auto_resolve_nearest(&mut self, id: Uuid) -> EngineResult<ProcessOutcome> {
        let record = self.reviews.resolve_nearest(id)?;
        self.reprocess(&record.employee_id, record.date)
    }

    /// Dismisses a pending record. The segment stays unassigned and the key
    /// is not re-escalated on later runs.
    pub fn dismiss_review(
        &mut self,
        id: Uuid,
        reviewer: &str,
        comments: Option<String>,
    ) -> EngineResult<ConfusedShiftRecord> {
        self.reviews.dismiss(id, reviewer, comments)
    }

    /// Computes a unit without writing anything.
    fn run_unit(
        &self,
        employee_id: &str,
        date: NaiveDate,
        punches: &[Punch],
    ) -> EngineResult<(DailyAttendanceAggregate, Option<Escalation>)> {
        let catalog = self.catalog.resolve(employee_id, date)?;
        let intervals = self.on_duty.approved_intervals(employee_id, date)?;

        let segments = segment_punches(punches, &catalog.shifts, &self.settings);

        let mut records = Vec::with_capacity(segments.len());
        let mut escalation = None;

        for segment in &segments {
            if !segment.is_matchable() {
                records.push(SegmentRecord::unassigned(segment));
                continue;
            }

            if let Some(result) = self.prior_resolution(employee_id, date, segment, &catalog.shifts)
            {
                records.push(self.resolved_record(segment, result, &catalog.shifts, &intervals));
                continue;
            }

            match match_segment(segment, &catalog, &self.settings) {
                MatchOutcome::Matched(result) => {
                    records.push(self.resolved_record(segment, result, &catalog.shifts, &intervals));
                }
                MatchOutcome::Escalated { candidates } => {
                    if let Some(in_time) = segment.in_time {
                        escalation = Some(Escalation {
                            in_time,
                            out_time: segment.out_time,
                            candidates,
                        });
                    }
                    records.push(SegmentRecord::unassigned(segment));
                }
                MatchOutcome::NoShiftsAvailable => {
                    records.push(SegmentRecord::unassigned(segment));
                }
            }
        }

        Ok((aggregate_day(employee_id, date, records), escalation))
    }

    /// Applies a prior manual/auto resolution for the unit's key, if one
    /// exists and its chosen shift is still in the catalog.
    fn prior_resolution(
        &self,
        employee_id: &str,
        date: NaiveDate,
        segment: &WorkSegment,
        shifts: &[ShiftDefinition],
    ) -> Option<MatchResult> {
        let record = self.reviews.get(employee_id, date)?;
        if record.status != ReviewStatus::Resolved {
            return None;
        }
        // The resolution belongs to the escalated segment, identified by
        // its IN punch; other segments of the day still match normally.
        if segment.in_time != Some(record.in_time) {
            return None;
        }
        let chosen = record.resolution.as_ref()?.shift_id.as_deref()?;
        let Some(shift) = shifts.iter().find(|s| s.id == chosen) else {
            warn!(
                employee_id,
                %date,
                shift_id = chosen,
                "Resolved shift no longer in catalog; leaving segment unassigned"
            );
            return None;
        };
        let in_time = segment.in_time?;
        Some(MatchResult {
            shift_id: shift.id.clone(),
            method: MatchMethod::Manual,
            late_in_minutes: crate::matching::late_in_minutes(
                in_time,
                shift,
                self.settings.late_in_grace_minutes,
            ),
            early_out_minutes: crate::matching::early_out_minutes(
                in_time,
                segment.out_time,
                shift,
                self.settings.early_out_grace_minutes,
            ),
            expected_hours: shift.expected_hours,
            distance_minutes: proximity_minutes(in_time, shift.start_time),
        })
    }

    /// Builds the segment record for a matched segment, reconciling on-duty
    /// intervals.
    fn resolved_record(
        &self,
        segment: &WorkSegment,
        result: MatchResult,
        shifts: &[ShiftDefinition],
        intervals: &[OnDutyInterval],
    ) -> SegmentRecord {
        let mut record = SegmentRecord::unassigned(segment);

        let Some(shift) = shifts.iter().find(|s| s.id == result.shift_id) else {
            // The matcher only assigns shifts from the catalog it was given.
            return record;
        };
        let adjustment = reconcile_on_duty(segment, shift, intervals);

        record.shift_id = Some(result.shift_id);
        record.method = Some(result.method);
        record.expected_hours = Some(result.expected_hours);
        record.late_in_minutes = Some(result.late_in_minutes);
        record.early_out_minutes = result.early_out_minutes;
        record.late_waived = adjustment.late_waived;
        record.early_waived = adjustment.early_waived;
        record.od_hours = adjustment.od_hours;
        record.adjusted_hours = adjustment.adjusted_hours;
        record.extra_hours = adjustment.extra_hours;
        record.standing = Some(adjustment.standing);
        record.payable = adjustment.payable;
        record
    }
}
