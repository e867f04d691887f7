//! Roster snapshot loading.
//!
//! This module provides the [`RosterLoader`] type for loading a roster
//! snapshot from YAML files. It stands in for the backend fetch layer when
//! the engine runs offline.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::calculation::{
    CoverageCalendar, build_branch_calendar, build_calendar, build_date_range,
};
use crate::error::{EngineError, EngineResult};

use super::types::{
    EmployeesFile, LeaveBalancesFile, LeaveIntervalsFile, RosterSnapshot, ShiftAssignmentsFile,
};

/// Loads and provides access to a roster snapshot.
///
/// # Directory Structure
///
/// ```text
/// config/sample/
/// ├── employees.yaml          # Roster with branch membership
/// ├── shift_assignments.yaml  # Weekly AM/PM rest days
/// ├── leave_intervals.yaml    # Approved leave
/// └── leave_balances.yaml     # Remaining leave per employee and period
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::RosterLoader;
/// use chrono::NaiveDate;
///
/// let loader = RosterLoader::load("./config/sample").unwrap();
/// let start = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 3, 16).unwrap();
/// let calendar = loader.calendar(start, end);
/// println!("{} employees", calendar.len());
/// ```
#[derive(Debug, Clone)]
pub struct RosterLoader {
    snapshot: RosterSnapshot,
}

impl RosterLoader {
    /// Loads a snapshot from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `RosterLoader` on success, or an error if:
    /// - Any of the four files is missing
    /// - Any file contains invalid YAML or is missing required fields
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let employees = Self::load_yaml::<EmployeesFile>(&path.join("employees.yaml"))?;
        let assignments =
            Self::load_yaml::<ShiftAssignmentsFile>(&path.join("shift_assignments.yaml"))?;
        let leaves = Self::load_yaml::<LeaveIntervalsFile>(&path.join("leave_intervals.yaml"))?;
        let balances = Self::load_yaml::<LeaveBalancesFile>(&path.join("leave_balances.yaml"))?;

        info!(
            path = %path.display(),
            employees = employees.employees.len(),
            shift_assignments = assignments.shift_assignments.len(),
            leave_intervals = leaves.leave_intervals.len(),
            leave_balances = balances.leave_balances.len(),
            "Loaded roster snapshot"
        );

        let snapshot = RosterSnapshot::new(
            employees.employees,
            assignments.shift_assignments,
            leaves.leave_intervals,
            balances.leave_balances,
        );

        Ok(Self { snapshot })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded snapshot.
    pub fn snapshot(&self) -> &RosterSnapshot {
        &self.snapshot
    }

    /// Builds the coverage calendar for the whole roster.
    pub fn calendar(&self, start: NaiveDate, end: NaiveDate) -> CoverageCalendar {
        build_calendar(
            self.snapshot.employees(),
            &build_date_range(start, end),
            self.snapshot.leave_intervals(),
            self.snapshot.shift_assignments(),
        )
    }

    /// Builds the coverage calendar for one branch.
    pub fn branch_calendar(
        &self,
        branch_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CoverageCalendar {
        build_branch_calendar(
            branch_id,
            self.snapshot.employees(),
            &build_date_range(start, end),
            self.snapshot.leave_intervals(),
            self.snapshot.shift_assignments(),
        )
    }
}
