//! Calendar date ranges and leave-day expansion.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::LeaveInterval;

/// Every calendar date from `start` to `end`, both inclusive, ascending.
///
/// Fails with [`EngineError::EmptyDateRange`] when `start` is after `end`.
pub fn checked_date_range(start: NaiveDate, end: NaiveDate) -> EngineResult<Vec<NaiveDate>> {
    if start > end {
        return Err(EngineError::EmptyDateRange { start, end });
    }
    Ok(start.iter_days().take_while(|day| *day <= end).collect())
}

/// Every calendar date from `start` to `end`, both inclusive, ascending.
///
/// # Arguments
///
/// * `start` - The first date of the range
/// * `end` - The last date of the range
///
/// # Returns
///
/// The dates in ascending order. An inverted range is a range with zero days
/// and yields an empty vector.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::build_date_range;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2025, 2, 27).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
///
/// let days: Vec<String> = build_date_range(start, end)
///     .iter()
///     .map(|d| d.to_string())
///     .collect();
/// assert_eq!(days, ["2025-02-27", "2025-02-28", "2025-03-01", "2025-03-02"]);
///
/// assert!(build_date_range(end, start).is_empty());
/// ```
pub fn build_date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    checked_date_range(start, end).unwrap_or_default()
}

/// Collects every leave date for one employee.
///
/// Overlapping intervals collapse into one set. Intervals ending before they
/// start contribute nothing.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::expand_leave_days;
/// use attendance_engine::models::LeaveInterval;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
/// let leaves = vec![
///     LeaveInterval { employee_id: "emp_001".to_string(), start_date: d(3), end_date: d(5) },
///     LeaveInterval { employee_id: "emp_001".to_string(), start_date: d(5), end_date: d(6) },
///     LeaveInterval { employee_id: "emp_002".to_string(), start_date: d(1), end_date: d(9) },
/// ];
///
/// let days = expand_leave_days(&leaves, "emp_001");
/// assert_eq!(days.len(), 4);
/// assert!(days.contains(&d(6)));
/// assert!(!days.contains(&d(7)));
/// ```
pub fn expand_leave_days(leave_intervals: &[LeaveInterval], employee_id: &str) -> HashSet<NaiveDate> {
    let mut days = HashSet::new();

    for interval in leave_intervals
        .iter()
        .filter(|interval| interval.employee_id == employee_id)
    {
        match leave_interval_days(interval) {
            Ok(interval_days) => days.extend(interval_days),
            Err(err) => warn!(
                employee_id = %interval.employee_id,
                reason = %err,
                "Skipping leave interval"
            ),
        }
    }

    days
}

fn leave_interval_days(interval: &LeaveInterval) -> EngineResult<Vec<NaiveDate>> {
    checked_date_range(interval.start_date, interval.end_date).map_err(|_| {
        EngineError::InvalidLeaveRange {
            start: interval.start_date,
            end: interval.end_date,
        }
    })
}
