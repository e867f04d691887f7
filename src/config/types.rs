//! Roster snapshot types.
//!
//! These mirror the YAML files of a snapshot directory and the aggregated
//! in-memory snapshot the calculators read from.

use std::collections::HashMap;

use serde::Deserialize;

use crate::calculation::LeaveBalanceLookup;
use crate::models::{Employee, LeaveBalance, LeaveInterval, ShiftAssignment};

/// `employees.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeesFile {
    /// The roster.
    pub employees: Vec<Employee>,
}

/// `shift_assignments.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ShiftAssignmentsFile {
    /// One weekly rest-day assignment per employee.
    pub shift_assignments: Vec<ShiftAssignment>,
}

/// `leave_intervals.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveIntervalsFile {
    /// Approved leave intervals.
    pub leave_intervals: Vec<LeaveInterval>,
}

/// A balance entry in `leave_balances.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveBalanceRecord {
    /// The employee the balance belongs to.
    pub employee_id: String,
    /// The leave period (e.g. `"2025"`).
    pub period: String,
    /// Days assigned for the period.
    pub total_days_assigned: u32,
    /// Days still available.
    pub remaining_days: u32,
}

/// `leave_balances.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveBalancesFile {
    /// Balance entries.
    pub leave_balances: Vec<LeaveBalanceRecord>,
}

/// All roster data loaded from a snapshot directory.
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    employees: Vec<Employee>,
    shift_assignments: HashMap<String, ShiftAssignment>,
    leave_intervals: Vec<LeaveInterval>,
    leave_balances: HashMap<(String, String), LeaveBalance>,
}

impl RosterSnapshot {
    /// Creates a snapshot from its component parts.
    ///
    /// Assignments are keyed by employee; a later assignment for the same
    /// employee replaces an earlier one.
    pub fn new(
        employees: Vec<Employee>,
        shift_assignments: Vec<ShiftAssignment>,
        leave_intervals: Vec<LeaveInterval>,
        leave_balances: Vec<LeaveBalanceRecord>,
    ) -> Self {
        let shift_assignments = shift_assignments
            .into_iter()
            .map(|assignment| (assignment.employee_id.clone(), assignment))
            .collect();

        let leave_balances = leave_balances
            .into_iter()
            .map(|record| {
                (
                    (record.employee_id, record.period),
                    LeaveBalance {
                        total_days_assigned: record.total_days_assigned,
                        remaining_days: record.remaining_days,
                    },
                )
            })
            .collect();

        Self {
            employees,
            shift_assignments,
            leave_intervals,
            leave_balances,
        }
    }

    /// The roster.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Rest-day assignments keyed by employee id.
    pub fn shift_assignments(&self) -> &HashMap<String, ShiftAssignment> {
        &self.shift_assignments
    }

    /// Approved leave intervals.
    pub fn leave_intervals(&self) -> &[LeaveInterval] {
        &self.leave_intervals
    }
}

impl LeaveBalanceLookup for RosterSnapshot {
    fn remaining_balance(&self, employee_id: &str, period: &str) -> Option<LeaveBalance> {
        self.leave_balances.remaining_balance(employee_id, period)
    }
}
