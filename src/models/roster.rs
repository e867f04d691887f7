//! Roster models: employees, weekly rest-day assignments, approved leave.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// An employee on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    pub name: String,
    /// The branch the employee belongs to, if known.
    #[serde(default)]
    pub branch_id: Option<String>,
}

/// Weekly rest-day rotation for one employee.
///
/// Rest days use ISO numbering: 1 = Monday through 7 = Sunday. Morning and
/// afternoon are assigned independently so an employee may rest half a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    /// The employee this assignment belongs to.
    pub employee_id: String,
    /// The branch the employee is assigned to.
    pub branch_id: String,
    /// ISO weekday of the morning rest, if any.
    #[serde(default, deserialize_with = "lenient_rest_day")]
    pub rest_day_morning: Option<u8>,
    /// ISO weekday of the afternoon rest, if any.
    #[serde(default, deserialize_with = "lenient_rest_day")]
    pub rest_day_afternoon: Option<u8>,
}

/// Reads a rest day as any integer; values that do not fit a weekday byte
/// (negative or above 255) become no rest instead of failing the record.
///
/// Values that fit but lie outside 1..=7 are kept and rejected later, when the
/// assignment is classified.
fn lenient_rest_day<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match u8::try_from(value) {
        Ok(day) => Some(day),
        Err(_) => {
            warn!(value, "Ignoring out-of-range rest day");
            None
        }
    }))
}

/// An approved leave interval. Both ends are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveInterval {
    /// The employee on leave.
    pub employee_id: String,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave.
    pub end_date: NaiveDate,
}

/// Leave balance for one employee and period, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// Days assigned for the period. Zero means no allocation exists yet.
    pub total_days_assigned: u32,
    /// Days still available to book.
    pub remaining_days: u32,
}
