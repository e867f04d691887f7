//! Calculation logic for the attendance engine.
//!
//! This module contains the shared civil-time utilities, the punctuality
//! deviation calculator, date range and leave expansion, the coverage
//! calendar builder, and the leave request state machine. Everything here is
//! pure: no I/O and no shared mutable state.

mod civil_time;
mod coverage;
mod date_range;
mod deviation;
mod leave_request;

pub use civil_time::{
    LocalCivilTime, ORG_UTC_OFFSET_MINUTES, display_local_time, format_elapsed, inclusive_days,
    iso_weekday, org_offset, parse_hhmm, parse_utc_timestamp, to_local_civil_time,
};
pub use coverage::{
    CoverageCalendar, build_branch_calendar, build_calendar, classify_day, employees_in_branch,
    summarize_coverage,
};
pub use date_range::{build_date_range, checked_date_range, expand_leave_days};
pub use deviation::{
    DEVIATION_TOLERANCE_MINUTES, Deviation, NO_DEVIATION_TEXT, annotate_event, annotate_events,
    build_expected_local_time, compute_deviation, is_out_of_policy, measure_deviation,
};
pub use leave_request::{
    DaysField, LeaveBalanceLookup, LeaveRequestForm, LeaveRequestState, LeaveSubmission,
    PeriodEvaluation, PeriodSelection, validate_leave_range,
};
