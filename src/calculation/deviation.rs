//! Punctuality deviation for attendance marks.
//!
//! A mark is compared against its expected shift time on the same local
//! calendar day. Clock-ins are flagged when late, clock-outs when early, each
//! beyond a half-minute tolerance. The displayed text is always the absolute
//! elapsed time; the sign only drives the flag.
//!
//! Expected times are anchored to the mark's own local date, so a clock-out
//! just after midnight for a shift that ended the previous evening is compared
//! against the wrong day. That case is left as-is.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceEvent, AttendanceRow, DeviationResult, OperationConcept};

use super::civil_time::{
    LocalCivilTime, display_local_time, format_elapsed, parse_hhmm, to_local_civil_time,
};

/// Tolerance before a deviation is flagged, in minutes (0.5).
pub const DEVIATION_TOLERANCE_MINUTES: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Text shown when neither a computed nor a backend deviation is available.
pub const NO_DEVIATION_TEXT: &str = "-";

const MILLIS_PER_MINUTE: i64 = 60_000;

/// A measured deviation between an actual mark and its expected time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deviation {
    /// The direction of the mark.
    pub concept: OperationConcept,
    /// The actual mark in local civil time.
    pub actual: LocalCivilTime,
    /// The expected shift time on the same local date.
    pub expected: LocalCivilTime,
    /// `actual - expected` in milliseconds.
    pub delta_millis: i64,
}

impl Deviation {
    /// Signed deviation in minutes. Positive means after the expected time.
    pub fn delta_minutes(&self) -> Decimal {
        Decimal::from(self.delta_millis) / Decimal::from(MILLIS_PER_MINUTE)
    }

    /// Whether the deviation falls outside policy for the mark's direction.
    pub fn is_out_of_policy(&self) -> bool {
        is_out_of_policy(self.concept, self.delta_minutes())
    }

    /// Absolute elapsed time as `HH:MM:SS`.
    pub fn display_text(&self) -> String {
        format_elapsed(self.delta_millis)
    }

    /// Converts the measurement into the displayed result.
    pub fn to_result(&self) -> DeviationResult {
        DeviationResult {
            display_text: self.display_text(),
            is_out_of_policy: self.is_out_of_policy(),
        }
    }
}

/// Applies the direction-dependent tolerance rule.
///
/// Clock-ins are out of policy when more than the tolerance late; clock-outs
/// when more than the tolerance early. Exactly at the tolerance is on time.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::is_out_of_policy;
/// use attendance_engine::models::OperationConcept;
/// use rust_decimal::Decimal;
///
/// let half = Decimal::new(5, 1);
/// assert!(!is_out_of_policy(OperationConcept::Ingreso, half));
/// assert!(is_out_of_policy(OperationConcept::Ingreso, Decimal::new(51, 2)));
/// assert!(!is_out_of_policy(OperationConcept::Egreso, Decimal::new(10, 0)));
/// assert!(is_out_of_policy(OperationConcept::Egreso, Decimal::new(-1, 0)));
/// ```
pub fn is_out_of_policy(concept: OperationConcept, delta_minutes: Decimal) -> bool {
    match concept {
        OperationConcept::Ingreso => delta_minutes > DEVIATION_TOLERANCE_MINUTES,
        OperationConcept::Egreso => delta_minutes < -DEVIATION_TOLERANCE_MINUTES,
    }
}

/// Anchors an `HH:MM` expected time to the date of `reference`.
///
/// # Arguments
///
/// * `reference` - The actual mark in local civil time
/// * `expected_hhmm` - The expected shift time as `HH:MM`, if any
///
/// # Returns
///
/// The expected time on the reference's local date, or `None` when the
/// expected time is missing or malformed.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::{build_expected_local_time, to_local_civil_time};
///
/// let actual = to_local_civil_time("2025-03-10T11:31:27Z").unwrap();
/// let expected = build_expected_local_time(actual, Some("08:30")).unwrap();
/// assert_eq!(expected.to_string(), "10/03/2025 08:30:00");
///
/// assert!(build_expected_local_time(actual, Some("8h30")).is_none());
/// assert!(build_expected_local_time(actual, None).is_none());
/// ```
pub fn build_expected_local_time(
    reference: LocalCivilTime,
    expected_hhmm: Option<&str>,
) -> Option<LocalCivilTime> {
    anchor_expected_time(reference, expected_hhmm).ok()
}

fn anchor_expected_time(
    reference: LocalCivilTime,
    expected_hhmm: Option<&str>,
) -> EngineResult<LocalCivilTime> {
    let text = expected_hhmm.ok_or(EngineError::MissingExpectedTime)?;
    let time = parse_hhmm(text)?;
    Ok(LocalCivilTime::from_date_time(reference.date(), time))
}

/// Measures the deviation of an event, or reports why it cannot be measured.
///
/// Checks run in order: operation concept, timestamp, expected time. The
/// first failure is returned.
pub fn measure_deviation(event: &AttendanceEvent) -> EngineResult<Deviation> {
    let concept = event
        .concept()
        .ok_or_else(|| EngineError::UnknownOperationConcept {
            value: event.operation_concept.clone().unwrap_or_default(),
        })?;

    let timestamp = event
        .timestamp_utc
        .as_deref()
        .ok_or_else(|| EngineError::UnparseableTimestamp {
            input: String::new(),
        })?;
    let actual = to_local_civil_time(timestamp)?;
    let expected = anchor_expected_time(actual, event.expected_time.as_deref())?;

    Ok(Deviation {
        concept,
        actual,
        expected,
        delta_millis: actual.millis_since(expected),
    })
}

/// Computes the displayed deviation for an attendance event.
///
/// # Arguments
///
/// * `event` - The attendance event as received from the feed
///
/// # Returns
///
/// A [`DeviationResult`] with the absolute elapsed time as `HH:MM:SS` and the
/// out-of-policy flag for the event's direction.
///
/// Never fails: when the event lacks a usable concept, expected time, or
/// timestamp, the backend's precomputed text (or `"-"`) is shown unflagged.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::compute_deviation;
/// use attendance_engine::models::AttendanceEvent;
///
/// let event = AttendanceEvent {
///     id: "att_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     // 08:31:00 local
///     timestamp_utc: Some("2025-03-10T11:31:00Z".to_string()),
///     operation_concept: Some("INGRESO".to_string()),
///     expected_time: Some("08:30".to_string()),
///     branch_id: None,
///     raw_delta_text: None,
/// };
///
/// let result = compute_deviation(&event);
/// assert_eq!(result.display_text, "00:01:00");
/// assert!(result.is_out_of_policy);
/// ```
pub fn compute_deviation(event: &AttendanceEvent) -> DeviationResult {
    match measure_deviation(event) {
        Ok(deviation) => deviation.to_result(),
        Err(err) => {
            debug!(
                event_id = %event.id,
                employee_id = %event.employee_id,
                reason = %err,
                "Deviation not computable, using backend text"
            );
            DeviationResult {
                display_text: event
                    .raw_delta_text
                    .clone()
                    .unwrap_or_else(|| NO_DEVIATION_TEXT.to_string()),
                is_out_of_policy: false,
            }
        }
    }
}

/// Builds the attendance table row for one event.
pub fn annotate_event(event: &AttendanceEvent) -> AttendanceRow {
    let local_time = event
        .timestamp_utc
        .as_deref()
        .map(display_local_time)
        .unwrap_or_else(|| NO_DEVIATION_TEXT.to_string());

    AttendanceRow {
        id: event.id.clone(),
        employee_id: event.employee_id.clone(),
        branch_id: event.branch_id.clone(),
        concept: event.concept(),
        local_time,
        deviation: compute_deviation(event),
    }
}

/// Builds attendance table rows for a batch of events, preserving order.
pub fn annotate_events(events: &[AttendanceEvent]) -> Vec<AttendanceRow> {
    events.iter().map(annotate_event).collect()
}
