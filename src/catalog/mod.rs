//! Shift catalog resolution.
//!
//! The catalog resolver produces the ordered candidate shift list for an
//! employee/date by walking a priority chain: pre-scheduled shift →
//! designation-level list → department-level list → all active shifts. The
//! chain stops at the first non-empty tier.

mod directory;

pub use directory::{EmployeeProfile, ShiftDirectory};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::ShiftDefinition;

/// The tier of the priority chain that produced a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogTier {
    /// An exact pre-scheduled shift for the date. Single shift; assigned
    /// directly, short-circuiting proximity matching.
    PreScheduled,
    /// The employee's designation-level shift list.
    Designation,
    /// The employee's department-level shift list.
    Department,
    /// All active shift definitions (fallback).
    General,
    /// No shifts available (unknown employee or empty directory).
    None,
}

/// The ordered candidate shift list for an employee/date, plus the tier
/// that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftCatalog {
    /// The candidate shifts, in resolution order.
    pub shifts: Vec<ShiftDefinition>,
    /// The tier the chain stopped at.
    pub tier: CatalogTier,
}

impl ShiftCatalog {
    /// An empty catalog (tier `None`).
    pub fn empty() -> Self {
        Self {
            shifts: Vec::new(),
            tier: CatalogTier::None,
        }
    }

    /// Returns true if no shifts are available.
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }
}

/// Read-only source of candidate shift lists.
///
/// A failed resolve aborts the current (employee, date) unit only and is
/// reported as retryable.
pub trait CatalogSource {
    /// Resolves the ordered candidate shift list for an employee/date.
    fn resolve(&self, employee_id: &str, date: NaiveDate) -> EngineResult<ShiftCatalog>;
}
