//! Shared date and time utilities.
//!
//! Attendance marks arrive as UTC instants. The organization works on a single
//! fixed civil offset, so conversion never consults the host's time zone
//! database: the offset is the compile-time constant [`ORG_UTC_OFFSET_MINUTES`].

use std::fmt;

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound, Utc,
};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The organization's fixed offset from UTC, in minutes (UTC-03:00).
pub const ORG_UTC_OFFSET_MINUTES: i32 = -180;

/// Offset-less timestamp layouts accepted as UTC.
const NAIVE_UTC_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// A local calendar date and time with whole-second precision.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::to_local_civil_time;
///
/// let local = to_local_civil_time("2025-03-10T11:31:00Z").unwrap();
/// assert_eq!(local.to_string(), "10/03/2025 08:31:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocalCivilTime(NaiveDateTime);

impl LocalCivilTime {
    /// Wraps a naive local date-time, dropping any sub-second part.
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime.trunc_subsecs(0))
    }

    /// Combines a local date with a local time of day.
    pub fn from_date_time(date: NaiveDate, time: NaiveTime) -> Self {
        Self::new(date.and_time(time))
    }

    /// The local calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    /// The underlying naive date-time.
    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Signed milliseconds from `earlier` to `self`.
    pub fn millis_since(&self, earlier: LocalCivilTime) -> i64 {
        (self.0 - earlier.0).num_milliseconds()
    }
}

impl fmt::Display for LocalCivilTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%d/%m/%Y %H:%M:%S"))
    }
}

/// The organization's offset as a chrono [`FixedOffset`].
pub fn org_offset() -> FixedOffset {
    FixedOffset::east_opt(ORG_UTC_OFFSET_MINUTES * 60).expect("Valid organization offset")
}

/// Parses an ISO-8601 timestamp into a UTC instant.
///
/// Timestamps with an explicit offset are honored; timestamps without one
/// are read as UTC, which is what the attendance backend emits.
pub fn parse_utc_timestamp(input: &str) -> EngineResult<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(with_offset.with_timezone(&Utc));
    }

    NAIVE_UTC_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| EngineError::UnparseableTimestamp {
            input: input.to_string(),
        })
}

/// Converts a UTC timestamp string into the organization's local civil time.
///
/// Returns [`EngineError::UnparseableTimestamp`] when the input is not a
/// parseable ISO-8601 string; callers display the raw text in that case.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::to_local_civil_time;
/// use chrono::NaiveDate;
///
/// // 02:15 UTC is still the previous evening locally.
/// let local = to_local_civil_time("2025-03-11T02:15:30.750Z").unwrap();
/// assert_eq!(local.date(), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
/// assert_eq!(local.to_string(), "10/03/2025 23:15:30");
///
/// assert!(to_local_civil_time("sin marca").is_err());
/// ```
pub fn to_local_civil_time(timestamp_utc: &str) -> EngineResult<LocalCivilTime> {
    let instant = parse_utc_timestamp(timestamp_utc)?;
    Ok(LocalCivilTime::new(
        instant.with_timezone(&org_offset()).naive_local(),
    ))
}

/// Local display text for a UTC timestamp, or the raw input if unparseable.
pub fn display_local_time(timestamp_utc: &str) -> String {
    match to_local_civil_time(timestamp_utc) {
        Ok(local) => local.to_string(),
        Err(_) => timestamp_utc.to_string(),
    }
}

/// Parses an `HH:MM` shift time. Trailing seconds (`HH:MM:SS`) are ignored.
pub fn parse_hhmm(text: &str) -> EngineResult<NaiveTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(EngineError::MissingExpectedTime);
    }

    let malformed = || EngineError::MalformedExpectedTime {
        input: text.to_string(),
    };

    let mut parts = trimmed.split(':');
    let hour: u32 = parts
        .next()
        .and_then(|h| h.trim().parse().ok())
        .ok_or_else(malformed)?;
    let minute: u32 = parts
        .next()
        .and_then(|m| m.trim().parse().ok())
        .ok_or_else(malformed)?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(malformed)
}

/// Formats an elapsed duration as zero-padded `HH:MM:SS`, ignoring sign.
///
/// Hours are not wrapped at 24.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::format_elapsed;
///
/// assert_eq!(format_elapsed(-300_000), "00:05:00");
/// assert_eq!(format_elapsed(93_784_000), "26:03:04");
/// ```
pub fn format_elapsed(millis: i64) -> String {
    let total_seconds = millis.unsigned_abs() / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// ISO weekday number: 1 = Monday through 7 = Sunday.
pub fn iso_weekday(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

/// Number of calendar days from `start` to `end`, counting both ends.
///
/// Zero or negative when `end` is before `start`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}
