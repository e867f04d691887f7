//! Error types for the attendance engine.
//!
//! The calculators degrade to safe display values instead of failing, so most
//! of these variants never reach a caller of the public calculation API. They
//! are still produced internally and propagated with `?` until the point where
//! the degraded default is chosen. Loader errors and leave-request rejections
//! are surfaced directly.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the attendance engine.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::UnparseableTimestamp {
///     input: "not-a-date".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unparseable timestamp: not-a-date");
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A UTC timestamp could not be parsed as ISO-8601.
    #[error("Unparseable timestamp: {input}")]
    UnparseableTimestamp {
        /// The raw timestamp text.
        input: String,
    },

    /// An attendance event has a missing or unknown operation concept.
    #[error("Unknown operation concept: {value}")]
    UnknownOperationConcept {
        /// The raw concept text, empty when absent.
        value: String,
    },

    /// An attendance event has no expected shift time.
    #[error("Missing expected time")]
    MissingExpectedTime,

    /// The expected shift time is not a valid `HH:MM` value.
    #[error("Malformed expected time: {input}")]
    MalformedExpectedTime {
        /// The raw expected time text.
        input: String,
    },

    /// A rest-day value outside 1..=7 was found on a shift assignment.
    #[error("Malformed shift assignment for employee '{employee_id}': rest day {value}")]
    MalformedShiftAssignment {
        /// The employee owning the assignment.
        employee_id: String,
        /// The offending rest-day value.
        value: u8,
    },

    /// A date range whose start lies after its end.
    #[error("Empty date range: {start} to {end}")]
    EmptyDateRange {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
    },

    /// A leave range that ends before it starts.
    #[error("Invalid leave range: {end} is before {start}")]
    InvalidLeaveRange {
        /// The leave start date.
        start: NaiveDate,
        /// The leave end date.
        end: NaiveDate,
    },

    /// A leave submission was attempted without both range dates.
    #[error("Incomplete leave range: both start and end dates are required")]
    IncompleteLeaveRange,

    /// A leave submission was attempted before any days value was entered.
    #[error("Missing days value for the selected period")]
    MissingDaysValue,

    /// The requested leave range is longer than the days available.
    #[error("Leave of {requested} days exceeds the {available} days available")]
    LeaveExceedsBalance {
        /// Inclusive length of the requested range in days.
        requested: i64,
        /// The current days field value.
        available: u32,
    },

    /// The days field cannot be edited in the current state.
    #[error("Days field is read-only in state {state}")]
    DaysFieldReadOnly {
        /// Name of the current state.
        state: String,
    },

    /// An action is not legal from the current leave-request state.
    #[error("Cannot {action} from state {state}")]
    InvalidTransition {
        /// The attempted action.
        action: String,
        /// Name of the current state.
        state: String,
    },

    /// A roster snapshot file was not found.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A roster snapshot file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An attendance feed payload could not be decoded.
    #[error("Failed to parse attendance feed: {message}")]
    FeedParseError {
        /// A description of the decode error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
