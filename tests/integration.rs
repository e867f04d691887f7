//! Integration tests for the attendance engine.
//!
//! This suite drives the public API end to end:
//! - Attendance feed decoding and table rows
//! - Clock-in and clock-out deviation scenarios
//! - Coverage calendars from the sample roster snapshot
//! - Branch coverage summaries
//! - Leave request flow against snapshot balances

use chrono::NaiveDate;

use attendance_engine::calculation::{
    LeaveRequestForm, LeaveRequestState, PeriodEvaluation, PeriodSelection, annotate_events,
    build_date_range, compute_deviation, summarize_coverage,
};
use attendance_engine::config::RosterLoader;
use attendance_engine::error::EngineError;
use attendance_engine::models::{
    AttendanceEvent, DayCategory, LeaveInterval, RestLabel, parse_attendance_feed,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn load_sample() -> RosterLoader {
    RosterLoader::load("./config/sample").expect("Failed to load sample snapshot")
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn event(concept: &str, expected: &str, timestamp: &str) -> AttendanceEvent {
    AttendanceEvent {
        id: "att_001".to_string(),
        employee_id: "emp_001".to_string(),
        timestamp_utc: Some(timestamp.to_string()),
        operation_concept: Some(concept.to_string()),
        expected_time: Some(expected.to_string()),
        branch_id: Some("suc_centro".to_string()),
        raw_delta_text: None,
    }
}

// =============================================================================
// Deviation scenarios
// =============================================================================

#[test]
fn test_clock_in_one_minute_late() {
    let result = compute_deviation(&event("INGRESO", "08:30", "2025-03-10T11:31:00Z"));
    assert!(result.is_out_of_policy);
    assert_eq!(result.display_text, "00:01:00");
}

#[test]
fn test_clock_out_five_minutes_early() {
    let result = compute_deviation(&event("EGRESO", "17:00", "2025-03-10T19:55:00Z"));
    assert!(result.is_out_of_policy);
    assert_eq!(result.display_text, "00:05:00");
}

#[test]
fn test_feed_rows_mix_computed_and_fallback_values() {
    let feed = r#"[
        {
            "id": "att_100",
            "employee_id": "emp_001",
            "timestamp_utc": "2025-03-10T11:29:50.000Z",
            "operation_concept": "INGRESO",
            "expected_time": "08:30",
            "branch_id": "suc_centro",
            "raw_delta_text": "00:00:10"
        },
        {
            "id": "att_101",
            "employee_id": "emp_002",
            "timestamp_utc": "2025-03-10T20:40:00Z",
            "operation_concept": "EGRESO",
            "expected_time": "18:00",
            "branch_id": "suc_centro"
        },
        {
            "id": "att_102",
            "employee_id": "emp_003",
            "timestamp_utc": "fecha invalida",
            "operation_concept": "INGRESO",
            "expected_time": "07:00",
            "raw_delta_text": "00:12:00"
        },
        {
            "id": "att_103",
            "employee_id": "emp_004",
            "timestamp_utc": "2025-03-10T10:05:00Z",
            "operation_concept": "INGRESO"
        }
    ]"#;

    let events = parse_attendance_feed(feed).unwrap();
    let rows = annotate_events(&events);
    assert_eq!(rows.len(), 4);

    // Early arrival: on time
    assert_eq!(rows[0].local_time, "10/03/2025 08:29:50");
    assert_eq!(rows[0].deviation.display_text, "00:00:10");
    assert!(!rows[0].deviation.is_out_of_policy);

    // Left 20 minutes early
    assert_eq!(rows[1].local_time, "10/03/2025 17:40:00");
    assert_eq!(rows[1].deviation.display_text, "00:20:00");
    assert_eq!(rows[1].deviation.emphasis(), Some("bold red"));

    // Unparseable timestamp: raw text and backend deviation
    assert_eq!(rows[2].local_time, "fecha invalida");
    assert_eq!(rows[2].deviation.display_text, "00:12:00");
    assert!(!rows[2].deviation.is_out_of_policy);

    // No expected time and no backend text
    assert_eq!(rows[3].local_time, "10/03/2025 07:05:00");
    assert_eq!(rows[3].deviation.display_text, "-");
}

#[test]
fn test_malformed_feed_is_rejected() {
    let err = parse_attendance_feed(r#"{"id": "att_100"}"#).unwrap_err();
    assert!(matches!(err, EngineError::FeedParseError { .. }));
}

// =============================================================================
// Coverage calendar
// =============================================================================

#[test]
fn test_sample_week_calendar() {
    // Monday 2025-03-10 through Sunday 2025-03-16
    let loader = load_sample();
    let calendar = loader.calendar(date("2025-03-10"), date("2025-03-16"));

    // emp_001: Saturday morning rest
    let row = &calendar["emp_001"];
    assert_eq!(row[5].category, DayCategory::Rest);
    assert_eq!(row[5].label, RestLabel::Am);
    assert_eq!(row[6].category, DayCategory::Weekend);
    assert!(row[..5].iter().all(|c| c.category == DayCategory::Normal));

    // emp_002: full Monday rest, leave Wednesday to Friday
    let row = &calendar["emp_002"];
    assert_eq!(row[0].category, DayCategory::Rest);
    assert_eq!(row[0].label, RestLabel::AmPm);
    assert_eq!(row[1].category, DayCategory::Normal);
    assert!(row[2..5].iter().all(|c| c.category == DayCategory::Leave));

    // emp_003: leave on Saturday wins over the weekend
    let row = &calendar["emp_003"];
    assert_eq!(row[2].category, DayCategory::Rest);
    assert_eq!(row[2].label, RestLabel::Pm);
    assert_eq!(row[5].category, DayCategory::Leave);
    assert_eq!(row[5].label, RestLabel::Empty);

    // emp_004: no assignment, so only weekend and normal days
    let row = &calendar["emp_004"];
    assert!(
        row.iter()
            .all(|c| matches!(c.category, DayCategory::Normal | DayCategory::Weekend))
    );
}

#[test]
fn test_branch_coverage_summary() {
    let loader = load_sample();
    let range = build_date_range(date("2025-03-10"), date("2025-03-16"));
    let calendar = loader.branch_calendar("suc_centro", date("2025-03-10"), date("2025-03-16"));
    let summary = summarize_coverage(&calendar, &range);

    assert_eq!(summary.len(), 7);
    assert!(summary.iter().all(|day| day.total() == 3));

    // Tuesday: emp_005 rests all day
    assert_eq!(summary[1].resting, 1);
    assert_eq!(summary[1].working, 2);

    // Wednesday: emp_002 on leave
    assert_eq!(summary[2].on_leave, 1);
    assert_eq!(summary[2].working, 2);

    // Saturday: emp_001 half rest, the rest weekend
    assert_eq!(summary[5].resting, 1);
    assert_eq!(summary[5].weekend, 2);
}

#[test]
fn test_inverted_calendar_range_is_empty() {
    let loader = load_sample();
    let calendar = loader.calendar(date("2025-03-16"), date("2025-03-10"));
    assert!(calendar.values().all(|row| row.is_empty()));
}

// =============================================================================
// Leave request flow
// =============================================================================

#[test]
fn test_leave_request_with_remaining_balance() {
    let loader = load_sample();
    let mut form = LeaveRequestForm::new();
    form.select_employee("emp_001");
    form.select_period("2025", loader.snapshot()).unwrap();

    assert!(form.range_editable());
    assert_eq!(form.days_field().value, Some(9));
    assert!(!form.days_field().editable);

    let submission = form
        .submit(Some(date("2025-04-07")), Some(date("2025-04-15")))
        .unwrap();
    let interval: LeaveInterval = submission.into();
    assert_eq!(interval.start_date, date("2025-04-07"));

    assert!(matches!(
        form.submit(Some(date("2025-04-07")), Some(date("2025-04-16"))),
        Err(EngineError::LeaveExceedsBalance {
            requested: 10,
            available: 9
        })
    ));
}

#[test]
fn test_leave_request_first_allocation() {
    let loader = load_sample();
    let mut form = LeaveRequestForm::new();
    form.select_employee("emp_003");
    let state = form.select_period("2025", loader.snapshot()).unwrap();

    assert!(matches!(
        state,
        LeaveRequestState::RangeEditable(PeriodSelection {
            evaluation: PeriodEvaluation::NoAssignment,
            days: None,
            ..
        })
    ));
    assert!(form.days_field().editable);

    form.enter_days(7).unwrap();
    assert!(
        form.submit(Some(date("2025-05-05")), Some(date("2025-05-11")))
            .is_ok()
    );
}

#[test]
fn test_leave_request_exhausted_balance() {
    let loader = load_sample();
    let mut form = LeaveRequestForm::new();
    form.select_employee("emp_004");
    form.select_period("2025", loader.snapshot()).unwrap();

    assert!(!form.range_editable());
    assert_eq!(form.days_field().value, Some(0));
}

#[test]
fn test_booked_leave_shows_on_calendar() {
    let loader = load_sample();
    let mut form = LeaveRequestForm::new();
    form.select_employee("emp_001");
    form.select_period("2025", loader.snapshot()).unwrap();
    let interval: LeaveInterval = form
        .submit(Some(date("2025-03-14")), Some(date("2025-03-15")))
        .unwrap()
        .into();

    let snapshot = loader.snapshot();
    let mut leaves = snapshot.leave_intervals().to_vec();
    leaves.push(interval);

    let range = build_date_range(date("2025-03-14"), date("2025-03-15"));
    let calendar = attendance_engine::calculation::build_calendar(
        snapshot.employees(),
        &range,
        &leaves,
        snapshot.shift_assignments(),
    );

    // Saturday was a morning rest; leave now takes priority
    let row = &calendar["emp_001"];
    assert_eq!(row[0].category, DayCategory::Leave);
    assert_eq!(row[1].category, DayCategory::Leave);
    assert_eq!(row[1].label, RestLabel::Empty);
}
