//! Core data models for the attendance engine.
//!
//! These are plain values handed in by the data-fetch layer or produced by
//! the calculators; none of them carry behavior beyond small accessors.

mod attendance;
mod calendar;
mod roster;

pub use attendance::{
    AttendanceEvent, AttendanceRow, DeviationResult, OperationConcept, parse_attendance_feed,
};
pub use calendar::{CalendarCell, DailyCoverage, DayCategory, RestLabel};
pub use roster::{Employee, LeaveBalance, LeaveInterval, ShiftAssignment};
