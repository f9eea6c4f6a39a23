//! In-memory shift directory backing the catalog resolver.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::error::EngineResult;
use crate::models::ShiftDefinition;

use super::{CatalogSource, CatalogTier, ShiftCatalog};

/// An employee's organizational placement, used to pick the designation-
/// and department-level shift lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeProfile {
    /// The employee's designation (job title) code.
    pub designation: String,
    /// The employee's department code.
    pub department: String,
}

/// In-memory shift directory.
///
/// Holds the active shift definitions plus the per-employee assignments the
/// priority chain draws from. Shift iteration order is deterministic (by
/// shift ID) so repeated resolution yields identical catalogs.
///
/// # Example
///
/// ```
/// use attendance_engine::catalog::{CatalogSource, CatalogTier, ShiftDirectory};
/// use attendance_engine::models::ShiftDefinition;
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let mut directory = ShiftDirectory::new();
/// directory.add_shift(ShiftDefinition {
///     id: "shift_morning".to_string(),
///     name: "Morning".to_string(),
///     start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///     end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
///     expected_hours: Decimal::new(90, 1),
///     grace_minutes: None,
/// });
/// directory.register_employee("emp_001", "engineer", "platform");
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let catalog = directory.resolve("emp_001", date).unwrap();
/// assert_eq!(catalog.tier, CatalogTier::General);
/// assert_eq!(catalog.shifts.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShiftDirectory {
    shifts: BTreeMap<String, ShiftDefinition>,
    employees: HashMap<String, EmployeeProfile>,
    pre_scheduled: HashMap<(String, NaiveDate), String>,
    designation_shifts: HashMap<String, Vec<String>>,
    department_shifts: HashMap<String, Vec<String>>,
}

impl ShiftDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an active shift definition.
    pub fn add_shift(&mut self, shift: ShiftDefinition) {
        self.shifts.insert(shift.id.clone(), shift);
    }

    /// Registers an employee with their designation and department.
    pub fn register_employee(&mut self, employee_id: &str, designation: &str, department: &str) {
        self.employees.insert(
            employee_id.to_string(),
            EmployeeProfile {
                designation: designation.to_string(),
                department: department.to_string(),
            },
        );
    }

    /// Pre-schedules a specific shift for an employee on a date.
    pub fn pre_schedule(&mut self, employee_id: &str, date: NaiveDate, shift_id: &str) {
        self.pre_scheduled
            .insert((employee_id.to_string(), date), shift_id.to_string());
    }

    /// Sets the shift list for a designation.
    pub fn assign_designation_shifts(&mut self, designation: &str, shift_ids: &[&str]) {
        self.designation_shifts.insert(
            designation.to_string(),
            shift_ids.iter().map(|s| s.to_string()).collect(),
        );
    }

    /// Sets the shift list for a department.
    pub fn assign_department_shifts(&mut self, department: &str, shift_ids: &[&str]) {
        self.department_shifts.insert(
            department.to_string(),
            shift_ids.iter().map(|s| s.to_string()).collect(),
        );
    }

    /// Looks up a shift definition by ID.
    pub fn shift(&self, shift_id: &str) -> Option<&ShiftDefinition> {
        self.shifts.get(shift_id)
    }

    fn collect(&self, ids: &[String]) -> Vec<ShiftDefinition> {
        ids.iter()
            .filter_map(|id| self.shifts.get(id).cloned())
            .collect()
    }

    /// Produces the shift list for a single tier, or `None` when the tier
    /// yields nothing for this employee/date.
    fn resolve_tier(
        &self,
        tier: CatalogTier,
        employee_id: &str,
        profile: &EmployeeProfile,
        date: NaiveDate,
    ) -> Option<Vec<ShiftDefinition>> {
        let shifts = match tier {
            CatalogTier::PreScheduled => self
                .pre_scheduled
                .get(&(employee_id.to_string(), date))
                .and_then(|id| self.shifts.get(id))
                .map(|shift| vec![shift.clone()])?,
            CatalogTier::Designation => self
                .designation_shifts
                .get(&profile.designation)
                .map(|ids| self.collect(ids))?,
            CatalogTier::Department => self
                .department_shifts
                .get(&profile.department)
                .map(|ids| self.collect(ids))?,
            CatalogTier::General => self.shifts.values().cloned().collect(),
            CatalogTier::None => Vec::new(),
        };
        if shifts.is_empty() { None } else { Some(shifts) }
    }
}

impl CatalogSource for ShiftDirectory {
    /// Walks the priority chain in order, returning the first non-empty
    /// tier. Unknown employee yields an empty catalog with tier `None`.
    fn resolve(&self, employee_id: &str, date: NaiveDate) -> EngineResult<ShiftCatalog> {
        let Some(profile) = self.employees.get(employee_id) else {
            return Ok(ShiftCatalog::empty());
        };

        let chain = [
            CatalogTier::PreScheduled,
            CatalogTier::Designation,
            CatalogTier::Department,
            CatalogTier::General,
        ];
        for tier in chain {
            if let Some(shifts) = self.resolve_tier(tier, employee_id, profile, date) {
                return Ok(ShiftCatalog { shifts, tier });
            }
        }
        Ok(ShiftCatalog::empty())
    }
}
