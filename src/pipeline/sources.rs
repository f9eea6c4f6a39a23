//! External source seams for the pipeline.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::EngineResult;
use crate::models::OnDutyInterval;

/// Read-only source of approved on-duty intervals.
///
/// A failed read aborts the current (employee, date) unit only and is
/// reported as retryable.
pub trait OnDutySource {
    /// Returns the approved OD intervals for an employee/date.
    fn approved_intervals(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<Vec<OnDutyInterval>>;
}

/// In-memory on-duty ledger.
///
/// Stores every recorded interval but only hands approved ones to the
/// pipeline.
#[derive(Debug, Clone, Default)]
pub struct OnDutyLedger {
    intervals: HashMap<(String, NaiveDate), Vec<OnDutyInterval>>,
}

impl OnDutyLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an interval under its (employee, date) key.
    pub fn record(&mut self, interval: OnDutyInterval) {
        self.intervals
            .entry((interval.employee_id.clone(), interval.date))
            .or_default()
            .push(interval);
    }
}

impl OnDutySource for OnDutyLedger {
    fn approved_intervals(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<Vec<OnDutyInterval>> {
        Ok(self
            .intervals
            .get(&(employee_id.to_string(), date))
            .map(|intervals| {
                intervals
                    .iter()
                    .filter(|i| i.approved)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
