//! Deadline calculation.
//!
//! [`DeadlineEngine`] maps a [`Ticket`] to its [`DeadlineSet`]. It never reads
//! a clock: operations that depend on the current instant take `now` from the
//! caller, so every result is reproducible from its inputs.
//!
//! # Rules by category
//!
//! | Category | internal | client | expiration | closing | recurring |
//! |---|---|---|---|---|---|
//! | Fault | task + 30m | case + 40m | case + 120m | expiration − 40m | case + 30m |
//! | Requirement | task + 60m | case + 60m | case + 240m | expiration − 40m | case + 30m |
//! | Special | task + 60m | case + 60m | scheduled + 24h | expiration − 40m | scheduled − 30m |
//!
//! Fault and Special use wall-clock minutes. Requirement uses wall-clock
//! minutes when the case was opened during business hours; otherwise both
//! creation instants are moved to the next working instant and every offset
//! counts working minutes only.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, warn};

use crate::calendar::BusinessCalendar;
use crate::error::DeadlineError;
use crate::model::{Category, DeadlineSet, Ticket};

/// Minute offsets for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Offsets {
    internal: i64,
    client: i64,
    expiration: i64,
    closing_lead: i64,
    recurring: i64,
}

const FAULT: Offsets = Offsets {
    internal: 30,
    client: 40,
    expiration: 120,
    closing_lead: 40,
    recurring: 30,
};

const REQUIREMENT: Offsets = Offsets {
    internal: 60,
    client: 60,
    expiration: 240,
    closing_lead: 40,
    recurring: 30,
};

const SPECIAL: Offsets = Offsets {
    internal: 60,
    client: 60,
    expiration: 24 * 60,
    closing_lead: 40,
    recurring: 30,
};

/// Interval used when the recurring follow-up is reset from "now".
pub const RECURRING_RESET_MINUTES: i64 = 30;

/// Pure deadline calculator bound to one business calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadlineEngine {
    calendar: BusinessCalendar,
}

impl DeadlineEngine {
    #[must_use]
    pub const fn new(calendar: BusinessCalendar) -> Self {
        Self { calendar }
    }

    #[must_use]
    pub const fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    /// Compute all five deadlines for `ticket`.
    ///
    /// Special tickets without a scheduled follow-up fail with
    /// [`DeadlineError::MissingSchedule`]. Either the whole set is returned or
    /// nothing is.
    pub fn compute_deadlines(&self, ticket: &Ticket) -> Result<DeadlineSet, DeadlineError> {
        let set = match ticket.category {
            Category::Fault => wall_clock(ticket.case_created_at, ticket.task_created_at, FAULT)?,
            Category::Requirement => self.requirement(ticket)?,
            Category::Special => {
                let scheduled = require_schedule(ticket)?;
                special(ticket, scheduled)?
            }
        };
        debug!(
            ticket = %ticket.ticket_number,
            category = %ticket.category,
            expiration = %set.case_expiration,
            "computed deadlines"
        );
        Ok(set)
    }

    /// Fresh recurring follow-up for an explicit reset at `now`.
    pub fn reset_recurring(
        &self,
        ticket: &Ticket,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, DeadlineError> {
        let recurring = match ticket.category {
            Category::Fault => plus(now, RECURRING_RESET_MINUTES)?,
            Category::Requirement => {
                if self.calendar.is_working_instant(now) {
                    plus(now, RECURRING_RESET_MINUTES)?
                } else {
                    let start = self.calendar.next_working_instant(now)?;
                    self.calendar
                        .add_working_minutes(start, RECURRING_RESET_MINUTES)?
                }
            }
            Category::Special => {
                let scheduled = require_schedule(ticket)?;
                if now < scheduled {
                    plus(scheduled, -SPECIAL.recurring)?
                } else {
                    plus(now, RECURRING_RESET_MINUTES)?
                }
            }
        };
        debug!(ticket = %ticket.ticket_number, %recurring, "reset recurring follow-up");
        Ok(recurring)
    }

    /// Deadlines for `ticket` once its follow-up is moved to `scheduled`.
    ///
    /// Only Special tickets can be rescheduled, and only to an instant strictly
    /// after `now`. The ticket itself is not modified; callers store the new
    /// schedule together with the returned set.
    pub fn reschedule(
        &self,
        ticket: &Ticket,
        scheduled: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<DeadlineSet, DeadlineError> {
        if ticket.category != Category::Special {
            warn!(ticket = %ticket.ticket_number, category = %ticket.category, "reschedule rejected");
            return Err(DeadlineError::Validation(format!(
                "only special tickets can be rescheduled; {} is {}",
                ticket.ticket_number, ticket.category
            )));
        }
        if scheduled <= now {
            warn!(ticket = %ticket.ticket_number, %scheduled, %now, "reschedule rejected");
            return Err(DeadlineError::Validation(format!(
                "scheduled follow-up {scheduled} must be after {now}"
            )));
        }
        self.compute_deadlines(&ticket.with_schedule(scheduled))
    }

    fn requirement(&self, ticket: &Ticket) -> Result<DeadlineSet, DeadlineError> {
        if self.calendar.is_working_instant(ticket.case_created_at) {
            return wall_clock(ticket.case_created_at, ticket.task_created_at, REQUIREMENT);
        }

        let cal = &self.calendar;
        let case = cal.next_working_instant(ticket.case_created_at)?;
        let task = cal.next_working_instant(ticket.task_created_at)?;
        let case_expiration = cal.add_working_minutes(case, REQUIREMENT.expiration)?;

        Ok(DeadlineSet {
            internal_follow_up: cal.add_working_minutes(task, REQUIREMENT.internal)?,
            client_follow_up: cal.add_working_minutes(case, REQUIREMENT.client)?,
            closing_follow_up: cal
                .subtract_working_minutes(case_expiration, REQUIREMENT.closing_lead)?,
            case_expiration,
            recurring_follow_up: cal.add_working_minutes(case, REQUIREMENT.recurring)?,
        })
    }
}

fn wall_clock(
    case: DateTime<Utc>,
    task: DateTime<Utc>,
    offsets: Offsets,
) -> Result<DeadlineSet, DeadlineError> {
    let case_expiration = plus(case, offsets.expiration)?;
    Ok(DeadlineSet {
        internal_follow_up: plus(task, offsets.internal)?,
        client_follow_up: plus(case, offsets.client)?,
        closing_follow_up: plus(case_expiration, -offsets.closing_lead)?,
        case_expiration,
        recurring_follow_up: plus(case, offsets.recurring)?,
    })
}

fn special(ticket: &Ticket, scheduled: DateTime<Utc>) -> Result<DeadlineSet, DeadlineError> {
    // Expiration counts from the scheduled follow-up, not from case creation.
    let case_expiration = plus(scheduled, SPECIAL.expiration)?;
    Ok(DeadlineSet {
        internal_follow_up: plus(ticket.task_created_at, SPECIAL.internal)?,
        client_follow_up: plus(ticket.case_created_at, SPECIAL.client)?,
        closing_follow_up: plus(case_expiration, -SPECIAL.closing_lead)?,
        case_expiration,
        recurring_follow_up: plus(scheduled, -SPECIAL.recurring)?,
    })
}

fn require_schedule(ticket: &Ticket) -> Result<DateTime<Utc>, DeadlineError> {
    ticket
        .scheduled_follow_up
        .ok_or_else(|| DeadlineError::MissingSchedule {
            ticket_number: ticket.ticket_number.clone(),
            category: ticket.category,
        })
}

fn plus(instant: DateTime<Utc>, minutes: i64) -> Result<DateTime<Utc>, DeadlineError> {
    TimeDelta::try_minutes(minutes)
        .and_then(|delta| instant.checked_add_signed(delta))
        .ok_or_else(|| {
            DeadlineError::InvalidTimestamp(format!("{instant} {minutes:+} minutes is out of range"))
        })
}
