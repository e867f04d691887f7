//! Coverage calendar cells and per-day coverage counts.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The single category a calendar cell resolves to.
///
/// Priority when several apply: `Leave` > `Rest` > `Weekend` > `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayCategory {
    /// Approved leave covers the day.
    Leave,
    /// Weekly rest day (full or half).
    Rest,
    /// Saturday or Sunday with no leave or rest.
    Weekend,
    /// Ordinary working day.
    Normal,
}

impl DayCategory {
    /// Background color used by the calendar grid. `Normal` is unstyled.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::DayCategory;
    ///
    /// assert_eq!(DayCategory::Leave.color(), Some("red"));
    /// assert_eq!(DayCategory::Normal.color(), None);
    /// ```
    pub fn color(&self) -> Option<&'static str> {
        match self {
            DayCategory::Leave => Some("red"),
            DayCategory::Rest => Some("blue"),
            DayCategory::Weekend => Some("yellow"),
            DayCategory::Normal => None,
        }
    }
}

impl fmt::Display for DayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayCategory::Leave => write!(f, "LEAVE"),
            DayCategory::Rest => write!(f, "REST"),
            DayCategory::Weekend => write!(f, "WEEKEND"),
            DayCategory::Normal => write!(f, "NORMAL"),
        }
    }
}

/// Which half of the day a rest covers. Empty for non-rest cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestLabel {
    /// No label.
    #[serde(rename = "")]
    Empty,
    /// Morning rest.
    #[serde(rename = "AM")]
    Am,
    /// Afternoon rest.
    #[serde(rename = "PM")]
    Pm,
    /// Full-day rest.
    #[serde(rename = "AM/PM")]
    AmPm,
}

impl RestLabel {
    /// Builds the label from the morning and afternoon rest flags.
    pub fn from_halves(morning: bool, afternoon: bool) -> Self {
        match (morning, afternoon) {
            (true, true) => RestLabel::AmPm,
            (true, false) => RestLabel::Am,
            (false, true) => RestLabel::Pm,
            (false, false) => RestLabel::Empty,
        }
    }

    /// The label text as rendered in the grid.
    pub fn as_str(&self) -> &'static str {
        match self {
            RestLabel::Empty => "",
            RestLabel::Am => "AM",
            RestLabel::Pm => "PM",
            RestLabel::AmPm => "AM/PM",
        }
    }
}

impl fmt::Display for RestLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One employee on one date in the coverage calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    /// The calendar date.
    pub date: NaiveDate,
    /// The employee this cell belongs to.
    pub employee_id: String,
    /// The resolved category.
    pub category: DayCategory,
    /// Rest half label; empty unless `category` is `Rest`.
    pub label: RestLabel,
}

/// Staffing counts for one date across a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCoverage {
    /// The calendar date.
    pub date: NaiveDate,
    /// Employees on approved leave.
    pub on_leave: usize,
    /// Employees on a full or half rest day.
    pub resting: usize,
    /// Employees off for the weekend.
    pub weekend: usize,
    /// Employees working a normal day.
    pub working: usize,
}

impl DailyCoverage {
    /// Total employees counted on this date.
    pub fn total(&self) -> usize {
        self.on_leave + self.resting + self.weekend + self.working
    }
}
