//! Property tests for deviation classification and calendar resolution.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use attendance_engine::calculation::{
    DEVIATION_TOLERANCE_MINUTES, build_calendar, build_date_range, classify_day,
    compute_deviation, expand_leave_days, measure_deviation, summarize_coverage,
};
use attendance_engine::models::{
    AttendanceEvent, DayCategory, Employee, LeaveInterval, RestLabel, ShiftAssignment,
};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
}

/// Builds an event whose local mark is `offset_seconds` from 12:00 local.
fn event_at_offset(concept: &str, offset_seconds: i64) -> AttendanceEvent {
    // 12:00 local is 15:00 UTC
    let utc = base_date().and_hms_opt(15, 0, 0).unwrap() + Duration::seconds(offset_seconds);
    AttendanceEvent {
        id: "att_prop".to_string(),
        employee_id: "emp_prop".to_string(),
        timestamp_utc: Some(utc.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
        operation_concept: Some(concept.to_string()),
        expected_time: Some("12:00".to_string()),
        branch_id: None,
        raw_delta_text: None,
    }
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..730).prop_map(|offset| base_date() + Duration::days(offset))
}

proptest! {
    #[test]
    fn ingreso_flagged_only_when_late_beyond_tolerance(offset in -36_000i64..36_000) {
        let event = event_at_offset("INGRESO", offset);
        let deviation = measure_deviation(&event).unwrap();
        let result = compute_deviation(&event);
        prop_assert_eq!(
            result.is_out_of_policy,
            deviation.delta_minutes() > DEVIATION_TOLERANCE_MINUTES
        );
        prop_assert_eq!(result.is_out_of_policy, offset > 30);
    }

    #[test]
    fn egreso_flagged_only_when_early_beyond_tolerance(offset in -36_000i64..36_000) {
        let event = event_at_offset("EGRESO", offset);
        let deviation = measure_deviation(&event).unwrap();
        let result = compute_deviation(&event);
        prop_assert_eq!(
            result.is_out_of_policy,
            deviation.delta_minutes() < -DEVIATION_TOLERANCE_MINUTES
        );
        prop_assert_eq!(result.is_out_of_policy, offset < -30);
    }

    #[test]
    fn display_text_ignores_sign(offset in 0i64..36_000) {
        let late = compute_deviation(&event_at_offset("INGRESO", offset));
        let early = compute_deviation(&event_at_offset("INGRESO", -offset));
        prop_assert_eq!(&late.display_text, &early.display_text);
        prop_assert!(!late.display_text.starts_with('-'));
        prop_assert_eq!(late.display_text.len(), 8);
    }

    #[test]
    fn delta_matches_offset(offset in -36_000i64..36_000) {
        let deviation = measure_deviation(&event_at_offset("INGRESO", offset)).unwrap();
        prop_assert_eq!(deviation.delta_millis, offset * 1000);
        prop_assert_eq!(deviation.delta_minutes().is_sign_negative(), offset < 0);
    }

    #[test]
    fn date_range_length_and_order(start in date_strategy(), len in 0i64..120) {
        let end = start + Duration::days(len);
        let days = build_date_range(start, end);
        prop_assert_eq!(days.len() as i64, len + 1);
        prop_assert_eq!(days.first(), Some(&start));
        prop_assert_eq!(days.last(), Some(&end));
        prop_assert!(days.windows(2).all(|w| w[1] == w[0] + Duration::days(1)));
    }

    #[test]
    fn inverted_date_range_is_empty(start in date_strategy(), gap in 1i64..120) {
        prop_assert!(build_date_range(start + Duration::days(gap), start).is_empty());
    }

    #[test]
    fn single_day_leave_expands_to_that_day(day in date_strategy()) {
        let leaves = vec![LeaveInterval {
            employee_id: "emp_prop".to_string(),
            start_date: day,
            end_date: day,
        }];
        prop_assert_eq!(expand_leave_days(&leaves, "emp_prop"), HashSet::from([day]));
    }

    #[test]
    fn leave_dominates_every_other_condition(
        day in date_strategy(),
        morning in proptest::option::of(1u8..=7),
        afternoon in proptest::option::of(1u8..=7),
    ) {
        let assignment = ShiftAssignment {
            employee_id: "emp_prop".to_string(),
            branch_id: "suc_prop".to_string(),
            rest_day_morning: morning,
            rest_day_afternoon: afternoon,
        };
        let cell = classify_day(day, "emp_prop", &HashSet::from([day]), Some(&assignment));
        prop_assert_eq!(cell.category, DayCategory::Leave);
        prop_assert_eq!(cell.label, RestLabel::Empty);
    }

    #[test]
    fn label_is_empty_unless_rest(
        day in date_strategy(),
        morning in proptest::option::of(0u8..=9),
        afternoon in proptest::option::of(0u8..=9),
    ) {
        let assignment = ShiftAssignment {
            employee_id: "emp_prop".to_string(),
            branch_id: "suc_prop".to_string(),
            rest_day_morning: morning,
            rest_day_afternoon: afternoon,
        };
        let cell = classify_day(day, "emp_prop", &HashSet::new(), Some(&assignment));
        prop_assert_eq!(cell.category == DayCategory::Rest, cell.label != RestLabel::Empty);
    }

    #[test]
    fn coverage_counts_sum_to_roster(
        start in date_strategy(),
        len in 0i64..40,
        rests in proptest::collection::vec(
            (proptest::option::of(1u8..=7), proptest::option::of(1u8..=7)),
            1..8,
        ),
    ) {
        let employees: Vec<Employee> = (0..rests.len())
            .map(|i| Employee {
                id: format!("emp_{:03}", i),
                name: format!("Employee {}", i),
                branch_id: None,
            })
            .collect();
        let assignments: HashMap<String, ShiftAssignment> = rests
            .iter()
            .enumerate()
            .map(|(i, (morning, afternoon))| {
                let id = format!("emp_{:03}", i);
                (
                    id.clone(),
                    ShiftAssignment {
                        employee_id: id,
                        branch_id: "suc_prop".to_string(),
                        rest_day_morning: *morning,
                        rest_day_afternoon: *afternoon,
                    },
                )
            })
            .collect();
        let leaves = vec![LeaveInterval {
            employee_id: "emp_000".to_string(),
            start_date: start,
            end_date: start + Duration::days(3),
        }];

        let range = build_date_range(start, start + Duration::days(len));
        let calendar = build_calendar(&employees, &range, &leaves, &assignments);
        let summary = summarize_coverage(&calendar, &range);

        prop_assert_eq!(summary.len(), range.len());
        prop_assert!(summary.iter().all(|day| day.total() == employees.len()));
        prop_assert!(summary.iter().take(4).all(|day| day.on_leave == 1));
    }
}
