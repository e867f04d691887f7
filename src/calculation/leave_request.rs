//! Leave request form as a linear state machine.
//!
//! ```text
//! NoEmployeeSelected
//!   -> NoPeriodSelected            (select_employee)
//!   -> RangeEditable | RangeLocked | PeriodEvaluated(BalanceUnknown)
//!                                  (select_period, via balance lookup)
//! PeriodEvaluated -> RangeEditable (enter_days)
//! ```
//!
//! Selecting an employee from any state clears everything downstream.
//! Submission is checked locally; a rejected submission never leaves the form.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveBalance, LeaveInterval};

use super::civil_time::inclusive_days;

/// Remaining-balance lookup keyed by employee and leave period.
///
/// `None` means the balance could not be determined.
pub trait LeaveBalanceLookup {
    /// Returns the balance for `employee_id` in `period`, if known.
    fn remaining_balance(&self, employee_id: &str, period: &str) -> Option<LeaveBalance>;
}

impl LeaveBalanceLookup for HashMap<(String, String), LeaveBalance> {
    fn remaining_balance(&self, employee_id: &str, period: &str) -> Option<LeaveBalance> {
        self.get(&(employee_id.to_string(), period.to_string()))
            .copied()
    }
}

/// Outcome of evaluating the balance for a selected period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PeriodEvaluation {
    /// The lookup returned nothing.
    BalanceUnknown,
    /// No days were ever assigned for the period; first allocation.
    NoAssignment,
    /// Days were assigned and all have been used.
    ZeroBalance,
    /// Days remain to be booked.
    PositiveBalance(u32),
}

impl PeriodEvaluation {
    /// Classifies a lookup result.
    pub fn from_lookup(balance: Option<LeaveBalance>) -> Self {
        match balance {
            None => PeriodEvaluation::BalanceUnknown,
            Some(b) if b.total_days_assigned == 0 => PeriodEvaluation::NoAssignment,
            Some(b) if b.remaining_days == 0 => PeriodEvaluation::ZeroBalance,
            Some(b) => PeriodEvaluation::PositiveBalance(b.remaining_days),
        }
    }

    /// Whether the days field accepts free entry.
    pub fn days_editable(&self) -> bool {
        matches!(
            self,
            PeriodEvaluation::BalanceUnknown | PeriodEvaluation::NoAssignment
        )
    }
}

/// Employee and period chosen on the form, with the evaluated balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSelection {
    /// The selected employee.
    pub employee_id: String,
    /// The selected leave period (e.g. `"2025"`).
    pub period: String,
    /// How the balance lookup came out.
    pub evaluation: PeriodEvaluation,
    /// Current days field value.
    pub days: Option<u32>,
}

/// The leave request form state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum LeaveRequestState {
    /// Nothing selected yet.
    #[default]
    NoEmployeeSelected,
    /// Employee chosen, period pending.
    NoPeriodSelected {
        /// The selected employee.
        employee_id: String,
    },
    /// Period chosen but range still locked until a days value is entered.
    PeriodEvaluated(PeriodSelection),
    /// Date range fields are editable.
    RangeEditable(PeriodSelection),
    /// No further leave can be booked for the period.
    RangeLocked(PeriodSelection),
}

impl LeaveRequestState {
    /// Short state name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            LeaveRequestState::NoEmployeeSelected => "NoEmployeeSelected",
            LeaveRequestState::NoPeriodSelected { .. } => "NoPeriodSelected",
            LeaveRequestState::PeriodEvaluated(_) => "PeriodEvaluated",
            LeaveRequestState::RangeEditable(_) => "RangeEditable",
            LeaveRequestState::RangeLocked(_) => "RangeLocked",
        }
    }

    fn selection(&self) -> Option<&PeriodSelection> {
        match self {
            LeaveRequestState::PeriodEvaluated(selection)
            | LeaveRequestState::RangeEditable(selection)
            | LeaveRequestState::RangeLocked(selection) => Some(selection),
            _ => None,
        }
    }
}

impl fmt::Display for LeaveRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the days field shows and whether it can be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaysField {
    /// The current value, if any.
    pub value: Option<u32>,
    /// Whether the user can type into it.
    pub editable: bool,
}

/// A locally validated leave request, ready to send to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveSubmission {
    /// The employee taking leave.
    pub employee_id: String,
    /// The leave period the days are drawn from.
    pub period: String,
    /// The days field value at submission.
    pub days: u32,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave.
    pub end_date: NaiveDate,
}

impl From<LeaveSubmission> for LeaveInterval {
    fn from(submission: LeaveSubmission) -> Self {
        LeaveInterval {
            employee_id: submission.employee_id,
            start_date: submission.start_date,
            end_date: submission.end_date,
        }
    }
}

/// The leave request form.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
///
/// use attendance_engine::calculation::{LeaveRequestForm, LeaveRequestState};
/// use attendance_engine::models::LeaveBalance;
/// use chrono::NaiveDate;
///
/// let balances = HashMap::from([(
///     ("emp_001".to_string(), "2025".to_string()),
///     LeaveBalance { total_days_assigned: 14, remaining_days: 5 },
/// )]);
///
/// let mut form = LeaveRequestForm::new();
/// form.select_employee("emp_001");
/// form.select_period("2025", &balances).unwrap();
/// assert!(matches!(form.state(), LeaveRequestState::RangeEditable(_)));
/// assert_eq!(form.days_field().value, Some(5));
/// assert!(!form.days_field().editable);
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
/// assert!(form.submit(Some(d(10)), Some(d(14))).is_ok());
/// assert!(form.submit(Some(d(10)), Some(d(15))).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LeaveRequestForm {
    state: LeaveRequestState,
}

impl LeaveRequestForm {
    /// A blank form.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    pub fn state(&self) -> &LeaveRequestState {
        &self.state
    }

    /// Selects an employee, clearing period, days and range.
    pub fn select_employee(&mut self, employee_id: impl Into<String>) {
        let employee_id = employee_id.into();
        debug!(employee_id = %employee_id, from = %self.state, "Leave form: employee selected");
        self.state = LeaveRequestState::NoPeriodSelected { employee_id };
    }

    /// Selects a period and evaluates its balance through `lookup`.
    ///
    /// Legal once an employee is selected; re-selecting a period re-evaluates.
    pub fn select_period(
        &mut self,
        period: impl Into<String>,
        lookup: &impl LeaveBalanceLookup,
    ) -> EngineResult<&LeaveRequestState> {
        let employee_id = match &self.state {
            LeaveRequestState::NoEmployeeSelected => {
                return Err(EngineError::InvalidTransition {
                    action: "select period".to_string(),
                    state: self.state.name().to_string(),
                });
            }
            LeaveRequestState::NoPeriodSelected { employee_id } => employee_id.clone(),
            other => other
                .selection()
                .map(|selection| selection.employee_id.clone())
                .unwrap_or_default(),
        };

        let period = period.into();
        let evaluation =
            PeriodEvaluation::from_lookup(lookup.remaining_balance(&employee_id, &period));

        debug!(
            employee_id = %employee_id,
            period = %period,
            evaluation = ?evaluation,
            "Leave form: period evaluated"
        );

        let selection = |days| PeriodSelection {
            employee_id: employee_id.clone(),
            period: period.clone(),
            evaluation,
            days,
        };

        self.state = match evaluation {
            PeriodEvaluation::BalanceUnknown => {
                LeaveRequestState::PeriodEvaluated(selection(None))
            }
            PeriodEvaluation::NoAssignment => LeaveRequestState::RangeEditable(selection(None)),
            PeriodEvaluation::ZeroBalance => LeaveRequestState::RangeLocked(selection(Some(0))),
            PeriodEvaluation::PositiveBalance(remaining) => {
                LeaveRequestState::RangeEditable(selection(Some(remaining)))
            }
        };

        Ok(&self.state)
    }

    /// Enters a days value. Only legal while the days field is free entry.
    pub fn enter_days(&mut self, days: u32) -> EngineResult<&LeaveRequestState> {
        let state_name = self.state.name();
        let selection = match &self.state {
            LeaveRequestState::PeriodEvaluated(selection)
            | LeaveRequestState::RangeEditable(selection) => selection,
            LeaveRequestState::RangeLocked(_) => {
                return Err(EngineError::DaysFieldReadOnly {
                    state: state_name.to_string(),
                });
            }
            _ => {
                return Err(EngineError::InvalidTransition {
                    action: "enter days".to_string(),
                    state: state_name.to_string(),
                });
            }
        };

        if !selection.evaluation.days_editable() {
            return Err(EngineError::DaysFieldReadOnly {
                state: state_name.to_string(),
            });
        }

        let updated = PeriodSelection {
            days: Some(days),
            ..selection.clone()
        };
        self.state = LeaveRequestState::RangeEditable(updated);
        Ok(&self.state)
    }

    /// The days field as currently displayed.
    pub fn days_field(&self) -> DaysField {
        match self.state.selection() {
            Some(selection) => DaysField {
                value: selection.days,
                editable: selection.evaluation.days_editable(),
            },
            None => DaysField {
                value: None,
                editable: false,
            },
        }
    }

    /// Whether the start/end date fields accept input.
    pub fn range_editable(&self) -> bool {
        matches!(self.state, LeaveRequestState::RangeEditable(_))
    }

    /// Validates a leave range against the current days value.
    ///
    /// Requires both dates, `end >= start`, and an inclusive length no longer
    /// than the days field. Nothing is sent anywhere on rejection.
    pub fn submit(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> EngineResult<LeaveSubmission> {
        let LeaveRequestState::RangeEditable(selection) = &self.state else {
            return Err(EngineError::InvalidTransition {
                action: "submit".to_string(),
                state: self.state.name().to_string(),
            });
        };

        let (Some(start_date), Some(end_date)) = (start_date, end_date) else {
            return Err(EngineError::IncompleteLeaveRange);
        };
        validate_leave_range(start_date, end_date, selection.days)?;

        let days = selection.days.ok_or(EngineError::MissingDaysValue)?;
        Ok(LeaveSubmission {
            employee_id: selection.employee_id.clone(),
            period: selection.period.clone(),
            days,
            start_date,
            end_date,
        })
    }
}

/// Checks a leave range against the available days.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::validate_leave_range;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
/// assert!(validate_leave_range(d(10), d(12), Some(3)).is_ok());
/// assert!(validate_leave_range(d(10), d(13), Some(3)).is_err());
/// assert!(validate_leave_range(d(12), d(10), Some(30)).is_err());
/// ```
pub fn validate_leave_range(
    start_date: NaiveDate,
    end_date: NaiveDate,
    available_days: Option<u32>,
) -> EngineResult<()> {
    if end_date < start_date {
        return Err(EngineError::InvalidLeaveRange {
            start: start_date,
            end: end_date,
        });
    }

    let available = available_days.ok_or(EngineError::MissingDaysValue)?;
    let requested = inclusive_days(start_date, end_date);
    if requested > i64::from(available) {
        return Err(EngineError::LeaveExceedsBalance {
            requested,
            available,
        });
    }

    Ok(())
}
