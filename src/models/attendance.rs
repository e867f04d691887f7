//! Attendance event model and derived deviation values.
//!
//! Attendance events arrive from the attendance backend as UTC marks; the
//! derived [`DeviationResult`] and [`AttendanceRow`] values are recomputed on
//! every render and never stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The direction of an attendance mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationConcept {
    /// Clock-in. Lateness is what matters.
    #[serde(rename = "INGRESO")]
    Ingreso,
    /// Clock-out. Leaving early is what matters.
    #[serde(rename = "EGRESO")]
    Egreso,
}

impl FromStr for OperationConcept {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INGRESO" => Ok(OperationConcept::Ingreso),
            "EGRESO" => Ok(OperationConcept::Egreso),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OperationConcept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationConcept::Ingreso => write!(f, "INGRESO"),
            OperationConcept::Egreso => write!(f, "EGRESO"),
        }
    }
}

/// A single attendance mark as returned by the attendance backend.
///
/// Every field other than the identifiers is optional because the backend
/// sends partial records; the calculators degrade instead of rejecting them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    /// Identifier of the attendance record.
    pub id: String,
    /// Identifier of the employee who punched.
    pub employee_id: String,
    /// The mark instant as an ISO-8601 UTC string.
    #[serde(default)]
    pub timestamp_utc: Option<String>,
    /// `"INGRESO"` or `"EGRESO"`, kept raw so unknown values degrade.
    #[serde(default)]
    pub operation_concept: Option<String>,
    /// Expected shift time as `HH:MM`.
    #[serde(default)]
    pub expected_time: Option<String>,
    /// Branch where the mark was taken.
    #[serde(default)]
    pub branch_id: Option<String>,
    /// Deviation text precomputed by the backend, shown as a fallback.
    #[serde(default)]
    pub raw_delta_text: Option<String>,
}

impl AttendanceEvent {
    /// Returns the parsed operation concept, if it is a known one.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::{AttendanceEvent, OperationConcept};
    ///
    /// let event = AttendanceEvent {
    ///     id: "1".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     timestamp_utc: None,
    ///     operation_concept: Some("egreso".to_string()),
    ///     expected_time: None,
    ///     branch_id: None,
    ///     raw_delta_text: None,
    /// };
    /// assert_eq!(event.concept(), Some(OperationConcept::Egreso));
    /// ```
    pub fn concept(&self) -> Option<OperationConcept> {
        self.operation_concept
            .as_deref()
            .and_then(|raw| raw.parse().ok())
    }
}

/// Punctuality outcome for one attendance event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviationResult {
    /// Absolute elapsed time as `HH:MM:SS`, or the fallback text.
    pub display_text: String,
    /// True when the mark deviates in the unfavorable direction.
    pub is_out_of_policy: bool,
}

impl DeviationResult {
    /// Styling hint for the table cell: `Some("bold red")` when out of policy.
    pub fn emphasis(&self) -> Option<&'static str> {
        self.is_out_of_policy.then_some("bold red")
    }
}

/// One row of the attendance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRow {
    /// Identifier of the attendance record.
    pub id: String,
    /// Identifier of the employee.
    pub employee_id: String,
    /// Branch where the mark was taken.
    pub branch_id: Option<String>,
    /// The operation concept, if known.
    pub concept: Option<OperationConcept>,
    /// Local civil time of the mark, or the raw timestamp if unparseable.
    pub local_time: String,
    /// The punctuality outcome.
    pub deviation: DeviationResult,
}

/// Decodes the JSON array returned by the attendance endpoint.
///
/// # Examples
///
/// ```
/// use attendance_engine::models::parse_attendance_feed;
///
/// let events = parse_attendance_feed(
///     r#"[{"id": "1", "employee_id": "emp_001", "operation_concept": "INGRESO"}]"#,
/// )
/// .unwrap();
/// assert_eq!(events.len(), 1);
/// assert!(events[0].timestamp_utc.is_none());
/// ```
pub fn parse_attendance_feed(json: &str) -> EngineResult<Vec<AttendanceEvent>> {
    serde_json::from_str(json).map_err(|e| EngineError::FeedParseError {
        message: e.to_string(),
    })
}
