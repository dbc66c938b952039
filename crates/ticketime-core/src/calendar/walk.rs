//! Duration arithmetic that only counts working time.
//!
//! Forward walks land in `(day_start, day_end]` of a working day (or on the
//! start itself for a zero-minute walk); backward walks consume each day's
//! window from `day_end` toward `day_start`. Because both directions visit the
//! same sequence of working days, subtracting `m` working minutes from the
//! result of adding `m` working minutes to a working instant returns exactly
//! that instant.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use tracing::trace;

use super::BusinessCalendar;
use crate::error::DeadlineError;

/// Upper bound on consecutive non-working days a single step may skip.
///
/// Ten years of holidays in a row means the configuration is broken; the
/// walk reports an error instead of spinning.
pub const MAX_DAY_STEPS: u32 = 3660;

impl BusinessCalendar {
    /// Earliest working instant at or after `instant`.
    ///
    /// Working instants come back unchanged. Before the window on a working
    /// day yields that day's `day_start`; anything else advances day by day to
    /// the next working day's `day_start`.
    pub fn next_working_instant(
        &self,
        instant: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, DeadlineError> {
        if self.is_working_instant(instant) {
            return Ok(instant);
        }

        let civil = self.to_civil(instant);
        let date = civil.date();
        if self.is_working_day(date) && civil.time() < self.day_start() {
            return self.at(date, self.day_start());
        }

        let next = self.working_day_after(date)?;
        self.at(next, self.day_start())
    }

    /// Add `minutes` of working time to `start`.
    ///
    /// A non-working `start` is first moved to [`Self::next_working_instant`].
    /// Negative budgets are rejected.
    pub fn add_working_minutes(
        &self,
        start: DateTime<Utc>,
        minutes: i64,
    ) -> Result<DateTime<Utc>, DeadlineError> {
        let mut remaining = working_budget(minutes)?;
        let mut current = self.next_working_instant(start)?;

        loop {
            let date = self.to_civil(current).date();
            let window_end = self.at(date, self.day_end())?;
            let available = window_end - current;

            if remaining <= available {
                return shift(current, remaining);
            }

            remaining -= available;
            trace!(%date, remaining_min = remaining.num_minutes(), "working window exhausted");
            current = self.next_working_instant(shift(window_end, TimeDelta::minutes(1))?)?;
        }
    }

    /// Subtract `minutes` of working time from `end`.
    ///
    /// An `end` inside `[day_start, day_end]` of a working day is used as-is;
    /// anything else is first pulled back to the closest earlier `day_end` of a
    /// working day.
    pub fn subtract_working_minutes(
        &self,
        end: DateTime<Utc>,
        minutes: i64,
    ) -> Result<DateTime<Utc>, DeadlineError> {
        let mut remaining = working_budget(minutes)?;
        let mut current = self.previous_window_instant(end)?;

        loop {
            let date = self.to_civil(current).date();
            let window_start = self.at(date, self.day_start())?;
            let available = current - window_start;

            if remaining <= available {
                return shift(current, -remaining);
            }

            remaining -= available;
            trace!(%date, remaining_min = remaining.num_minutes(), "working window exhausted");
            let previous = self.working_day_before(date)?;
            current = self.at(previous, self.day_end())?;
        }
    }

    /// Latest instant at or before `instant` that sits inside a closed
    /// working window `[day_start, day_end]`.
    fn previous_window_instant(
        &self,
        instant: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, DeadlineError> {
        let civil = self.to_civil(instant);
        let date = civil.date();
        let time = civil.time();

        if self.is_working_day(date) {
            if time >= self.day_start() && time <= self.day_end() {
                return Ok(instant);
            }
            if time > self.day_end() {
                return self.at(date, self.day_end());
            }
        }

        let previous = self.working_day_before(date)?;
        self.at(previous, self.day_end())
    }

    fn working_day_after(&self, date: NaiveDate) -> Result<NaiveDate, DeadlineError> {
        self.step_to_working_day(date, NaiveDate::succ_opt)
    }

    fn working_day_before(&self, date: NaiveDate) -> Result<NaiveDate, DeadlineError> {
        self.step_to_working_day(date, NaiveDate::pred_opt)
    }

    fn step_to_working_day(
        &self,
        from: NaiveDate,
        step: fn(&NaiveDate) -> Option<NaiveDate>,
    ) -> Result<NaiveDate, DeadlineError> {
        let mut date = from;
        for _ in 0..MAX_DAY_STEPS {
            date = step(&date).ok_or_else(|| {
                DeadlineError::InvalidTimestamp(format!("calendar walk left the date range at {date}"))
            })?;
            if self.is_working_day(date) {
                return Ok(date);
            }
        }
        Err(DeadlineError::InvalidTimestamp(format!(
            "no working day within {MAX_DAY_STEPS} days of {from}"
        )))
    }
}

fn working_budget(minutes: i64) -> Result<TimeDelta, DeadlineError> {
    if minutes < 0 {
        return Err(DeadlineError::Validation(format!(
            "working minutes must be non-negative, got {minutes}"
        )));
    }
    TimeDelta::try_minutes(minutes)
        .ok_or_else(|| DeadlineError::Validation(format!("{minutes} minutes is out of range")))
}

fn shift(instant: DateTime<Utc>, delta: TimeDelta) -> Result<DateTime<Utc>, DeadlineError> {
    instant
        .checked_add_signed(delta)
        .ok_or_else(|| DeadlineError::InvalidTimestamp(format!("{instant} + {delta} overflows")))
}
