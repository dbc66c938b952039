//! Time-remaining view over cached deadlines.
//!
//! Hosts refresh these on their own tick (the CLI evaluates once per
//! invocation); nothing here schedules work or reads a clock.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Countdown {
    /// Marked done by the caller; the clock no longer matters.
    Completed,
    /// The deadline is at or before `now`.
    Expired,
    Pending {
        #[serde(rename = "remaining_secs", serialize_with = "as_secs")]
        remaining: TimeDelta,
    },
    /// No deadline yet (Special ticket awaiting a schedule).
    Unscheduled,
}

impl Countdown {
    #[must_use]
    pub fn evaluate(deadline: Option<DateTime<Utc>>, completed: bool, now: DateTime<Utc>) -> Self {
        if completed {
            return Self::Completed;
        }
        let Some(deadline) = deadline else {
            return Self::Unscheduled;
        };
        let remaining = deadline - now;
        if remaining <= TimeDelta::zero() {
            Self::Expired
        } else {
            Self::Pending { remaining }
        }
    }

    #[must_use]
    pub const fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }

    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Expired => "expired",
            Self::Pending { .. } => "pending",
            Self::Unscheduled => "unscheduled",
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending { remaining } => {
                // whole minutes, rounded down
                let minutes = remaining.num_minutes();
                write!(f, "{}h {}m", minutes / 60, minutes % 60)
            }
            other => f.write_str(other.status()),
        }
    }
}

fn as_secs<S: serde::Serializer>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(delta.num_seconds())
}
