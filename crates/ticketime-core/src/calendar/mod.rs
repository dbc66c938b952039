//! Business-hours calendar.
//!
//! A [`BusinessCalendar`] classifies instants as working or non-working time
//! under a fixed policy: Monday through Friday, inside the half-open window
//! `[day_start, day_end)` of a fixed civil zone, excluding configured holiday
//! dates. The zone is a plain UTC offset with no daylight-saving rules.
//!
//! The duration walks that skip non-working time live in `walk.rs`; they are
//! inherent methods on the same type.

mod walk;

pub use walk::MAX_DAY_STEPS;

use std::collections::BTreeSet;

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
    Weekday,
};

use crate::config::ConfigError;
use crate::error::DeadlineError;

/// Default zone offset: UTC−05:00.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = -5 * 60;

/// Default holiday dates shipped with a fresh project.
pub const DEFAULT_HOLIDAYS: &[&str] = &["2024-11-04", "2024-12-25"];

/// Working-time policy for one fixed civil zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessCalendar {
    offset: FixedOffset,
    day_start: NaiveTime,
    day_end: NaiveTime,
    holidays: BTreeSet<NaiveDate>,
}

impl BusinessCalendar {
    /// Build a calendar with no holidays.
    ///
    /// The working window must be non-empty (`day_start < day_end`).
    pub fn new(
        offset: FixedOffset,
        day_start: NaiveTime,
        day_end: NaiveTime,
    ) -> Result<Self, ConfigError> {
        if day_start >= day_end {
            return Err(ConfigError::InvalidHours {
                start: day_start,
                end: day_end,
            });
        }
        Ok(Self {
            offset,
            day_start,
            day_end,
            holidays: BTreeSet::new(),
        })
    }

    /// Replace the holiday set. Duplicates collapse.
    #[must_use]
    pub fn with_holidays(mut self, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.holidays = holidays.into_iter().collect();
        self
    }

    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// `UTC-05:00` style name of the calendar's offset.
    #[must_use]
    pub fn zone_label(&self) -> String {
        format!("UTC{}", self.offset)
    }

    #[must_use]
    pub const fn day_start(&self) -> NaiveTime {
        self.day_start
    }

    #[must_use]
    pub const fn day_end(&self) -> NaiveTime {
        self.day_end
    }

    #[must_use]
    pub const fn holidays(&self) -> &BTreeSet<NaiveDate> {
        &self.holidays
    }

    /// Civil date and time-of-day of `instant` in the calendar's zone.
    #[must_use]
    pub fn to_civil(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.offset).naive_local()
    }

    /// The instant at civil `date` + `time` in the calendar's zone.
    pub fn at(&self, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, DeadlineError> {
        self.from_civil(date.and_time(time))
    }

    pub fn from_civil(&self, civil: NaiveDateTime) -> Result<DateTime<Utc>, DeadlineError> {
        self.offset
            .from_local_datetime(&civil)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| DeadlineError::InvalidTimestamp(format!("{civil} is out of range")))
    }

    #[must_use]
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// Weekday that is not a holiday.
    #[must_use]
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.is_holiday(date)
    }

    /// True when `instant` falls on a working day inside `[day_start, day_end)`.
    #[must_use]
    pub fn is_working_instant(&self, instant: DateTime<Utc>) -> bool {
        let civil = self.to_civil(instant);
        if !self.is_working_day(civil.date()) {
            return false;
        }
        let time = civil.time();
        time >= self.day_start && time < self.day_end
    }

    /// Parse a caller-supplied instant.
    ///
    /// Accepts RFC 3339 with an explicit offset, a naive
    /// `YYYY-MM-DDTHH:MM[:SS]` (or space-separated) civil time in this
    /// calendar's zone, or integer epoch milliseconds.
    pub fn parse_instant(&self, raw: &str) -> Result<DateTime<Utc>, DeadlineError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DeadlineError::InvalidTimestamp("empty timestamp".to_string()));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(dt.with_timezone(&Utc));
        }

        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
            if let Ok(civil) = NaiveDateTime::parse_from_str(trimmed, format) {
                return self.from_civil(civil);
            }
        }

        if let Ok(millis) = trimmed.parse::<i64>() {
            return DateTime::from_timestamp_millis(millis).ok_or_else(|| {
                DeadlineError::InvalidTimestamp(format!("{millis} ms is out of range"))
            });
        }

        Err(DeadlineError::InvalidTimestamp(format!("unparseable: '{trimmed}'")))
    }
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        let holidays = DEFAULT_HOLIDAYS
            .iter()
            .filter_map(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok());
        Self {
            offset: offset_from_minutes(DEFAULT_UTC_OFFSET_MINUTES).unwrap_or_else(|| Utc.fix()),
            day_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            day_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
            holidays: holidays.collect(),
        }
    }
}

/// Fixed offset for a signed number of minutes east of UTC.
#[must_use]
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}
