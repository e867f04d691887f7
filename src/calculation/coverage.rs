//! Coverage calendar: who is on leave, resting, or working on each day.
//!
//! Each cell resolves to exactly one [`DayCategory`] with the fixed priority
//! `Leave` > `Rest` > `Weekend` > `Normal`. Leave wins even when the date is
//! also the employee's rest day.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    CalendarCell, DailyCoverage, DayCategory, Employee, LeaveInterval, RestLabel, ShiftAssignment,
};

use super::civil_time::iso_weekday;
use super::date_range::expand_leave_days;

/// Calendar grid keyed by employee id; each row follows the date range order.
pub type CoverageCalendar = BTreeMap<String, Vec<CalendarCell>>;

/// Validated rest weekdays for one employee (ISO numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct RestDays {
    morning: Option<u8>,
    afternoon: Option<u8>,
}

impl RestDays {
    /// Reads the assignment, dropping any rest value outside 1..=7.
    fn from_assignment(assignment: Option<&ShiftAssignment>) -> Self {
        let Some(assignment) = assignment else {
            return Self::default();
        };

        let validate = |value| {
            validate_rest_day(&assignment.employee_id, value).unwrap_or_else(|err| {
                warn!(reason = %err, "Ignoring rest day");
                None
            })
        };

        Self {
            morning: validate(assignment.rest_day_morning),
            afternoon: validate(assignment.rest_day_afternoon),
        }
    }
}

fn validate_rest_day(employee_id: &str, value: Option<u8>) -> EngineResult<Option<u8>> {
    match value {
        Some(day) if !(1..=7).contains(&day) => Err(EngineError::MalformedShiftAssignment {
            employee_id: employee_id.to_string(),
            value: day,
        }),
        other => Ok(other),
    }
}

fn classify_with(
    date: NaiveDate,
    employee_id: &str,
    leave_days: &HashSet<NaiveDate>,
    rest: RestDays,
) -> CalendarCell {
    let weekday = iso_weekday(date);
    let is_leave = leave_days.contains(&date);
    let is_rest_morning = rest.morning == Some(weekday);
    let is_rest_afternoon = rest.afternoon == Some(weekday);
    let is_weekend = weekday >= 6;

    let (category, label) = if is_leave {
        (DayCategory::Leave, RestLabel::Empty)
    } else if is_rest_morning || is_rest_afternoon {
        (
            DayCategory::Rest,
            RestLabel::from_halves(is_rest_morning, is_rest_afternoon),
        )
    } else if is_weekend {
        (DayCategory::Weekend, RestLabel::Empty)
    } else {
        (DayCategory::Normal, RestLabel::Empty)
    };

    CalendarCell {
        date,
        employee_id: employee_id.to_string(),
        category,
        label,
    }
}

/// Classifies one employee on one date.
///
/// A missing assignment means no rest day is configured, so the employee can
/// only resolve to `Leave`, `Weekend`, or `Normal`.
///
/// # Arguments
///
/// * `date` - The calendar date to classify
/// * `employee_id` - The employee the cell belongs to
/// * `leave_days` - The employee's leave dates, from [`expand_leave_days`]
/// * `shift_assignment` - The employee's weekly rest assignment, if any
///
/// # Returns
///
/// A [`CalendarCell`] with exactly one category, by priority:
/// - [`DayCategory::Leave`] when the date is a leave day
/// - [`DayCategory::Rest`] when either half of the day is a rest day, labelled
///   `AM`, `PM`, or `AM/PM`
/// - [`DayCategory::Weekend`] on Saturday or Sunday
/// - [`DayCategory::Normal`] otherwise
///
/// Rest days outside 1..=7 are logged and treated as no rest.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
///
/// use attendance_engine::calculation::classify_day;
/// use attendance_engine::models::{DayCategory, RestLabel, ShiftAssignment};
/// use chrono::NaiveDate;
///
/// // 2025-03-15 is a Saturday
/// let saturday = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
/// let assignment = ShiftAssignment {
///     employee_id: "emp_001".to_string(),
///     branch_id: "suc_01".to_string(),
///     rest_day_morning: Some(6),
///     rest_day_afternoon: None,
/// };
///
/// let cell = classify_day(saturday, "emp_001", &HashSet::new(), Some(&assignment));
/// assert_eq!(cell.category, DayCategory::Rest);
/// assert_eq!(cell.label, RestLabel::Am);
///
/// let on_leave = HashSet::from([saturday]);
/// let cell = classify_day(saturday, "emp_001", &on_leave, Some(&assignment));
/// assert_eq!(cell.category, DayCategory::Leave);
/// assert_eq!(cell.label, RestLabel::Empty);
/// ```
pub fn classify_day(
    date: NaiveDate,
    employee_id: &str,
    leave_days: &HashSet<NaiveDate>,
    shift_assignment: Option<&ShiftAssignment>,
) -> CalendarCell {
    classify_with(
        date,
        employee_id,
        leave_days,
        RestDays::from_assignment(shift_assignment),
    )
}

/// Builds the calendar row for every employee over the date range.
///
/// # Arguments
///
/// * `employees` - The roster to lay out, one row each
/// * `date_range` - The dates to cover, usually from [`build_date_range`](super::build_date_range)
/// * `leave_intervals` - Approved leave for any employee; each row picks its own
/// * `shift_assignments` - Rest assignments keyed by employee id
///
/// # Returns
///
/// A [`CoverageCalendar`] keyed by employee id. Each row has one cell per entry
/// of `date_range`, in the same order. Rows are independent: each reads only
/// its own leave days and assignment.
pub fn build_calendar(
    employees: &[Employee],
    date_range: &[NaiveDate],
    leave_intervals: &[LeaveInterval],
    shift_assignments: &HashMap<String, ShiftAssignment>,
) -> CoverageCalendar {
    let calendar: CoverageCalendar = employees
        .iter()
        .map(|employee| {
            let leave_days = expand_leave_days(leave_intervals, &employee.id);
            let rest = RestDays::from_assignment(shift_assignments.get(&employee.id));
            let row = date_range
                .iter()
                .map(|date| classify_with(*date, &employee.id, &leave_days, rest))
                .collect();
            (employee.id.clone(), row)
        })
        .collect();

    debug!(
        employees = calendar.len(),
        days = date_range.len(),
        "Built coverage calendar"
    );
    calendar
}

/// Employees working at `branch_id`.
///
/// The employee's own branch is used when set, otherwise the branch of their
/// shift assignment.
pub fn employees_in_branch(
    employees: &[Employee],
    shift_assignments: &HashMap<String, ShiftAssignment>,
    branch_id: &str,
) -> Vec<Employee> {
    employees
        .iter()
        .filter(|employee| {
            let branch = employee.branch_id.as_deref().or_else(|| {
                shift_assignments
                    .get(&employee.id)
                    .map(|assignment| assignment.branch_id.as_str())
            });
            branch == Some(branch_id)
        })
        .cloned()
        .collect()
}

/// Builds the calendar restricted to one branch's roster.
pub fn build_branch_calendar(
    branch_id: &str,
    employees: &[Employee],
    date_range: &[NaiveDate],
    leave_intervals: &[LeaveInterval],
    shift_assignments: &HashMap<String, ShiftAssignment>,
) -> CoverageCalendar {
    let roster = employees_in_branch(employees, shift_assignments, branch_id);
    build_calendar(&roster, date_range, leave_intervals, shift_assignments)
}

/// Per-date staffing counts over a built calendar, in date range order.
///
/// Rows are read by position, so `date_range` must be the range the calendar
/// was built from. Half-day rests count as resting. The summary has one entry
/// per position in `date_range`, repeated dates included, and each entry's
/// four counts add up to the number of rows in the calendar.
///
/// # Arguments
///
/// * `calendar` - A calendar built by [`build_calendar`] or [`build_branch_calendar`]
/// * `date_range` - The dates the calendar rows were built over
///
/// # Returns
///
/// One [`DailyCoverage`] per entry of `date_range`, in the same order.
pub fn summarize_coverage(
    calendar: &CoverageCalendar,
    date_range: &[NaiveDate],
) -> Vec<DailyCoverage> {
    let mut summary: Vec<DailyCoverage> = date_range
        .iter()
        .map(|date| DailyCoverage {
            date: *date,
            on_leave: 0,
            resting: 0,
            weekend: 0,
            working: 0,
        })
        .collect();

    for row in calendar.values() {
        for (coverage, cell) in summary.iter_mut().zip(row) {
            match cell.category {
                DayCategory::Leave => coverage.on_leave += 1,
                DayCategory::Rest => coverage.resting += 1,
                DayCategory::Weekend => coverage.weekend += 1,
                DayCategory::Normal => coverage.working += 1,
            }
        }
    }

    summary
}
