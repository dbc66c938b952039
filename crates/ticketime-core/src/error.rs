use std::fmt;

use crate::model::Category;

/// Machine-readable error codes for scripts and agents driving `tkt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    InvalidHoliday,
    InvalidCalendar,
    InvalidCategory,
    InvalidTimestamp,
    MissingSchedule,
    ValidationFailed,
    TicketNotFound,
    AmbiguousId,
    DuplicateTicket,
    StoreCorrupt,
    StoreWriteFailed,
    LockContention,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::InvalidHoliday => "E1003",
            Self::InvalidCalendar => "E1004",
            Self::InvalidCategory => "E2001",
            Self::InvalidTimestamp => "E2002",
            Self::MissingSchedule => "E2003",
            Self::ValidationFailed => "E2004",
            Self::TicketNotFound => "E3001",
            Self::AmbiguousId => "E3002",
            Self::DuplicateTicket => "E3003",
            Self::StoreCorrupt => "E4001",
            Self::StoreWriteFailed => "E5001",
            Self::LockContention => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Ticket store not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidHoliday => "Invalid holiday in calendar configuration",
            Self::InvalidCalendar => "Invalid business hours or UTC offset",
            Self::InvalidCategory => "Invalid ticket category",
            Self::InvalidTimestamp => "Invalid timestamp",
            Self::MissingSchedule => "Special ticket has no scheduled follow-up",
            Self::ValidationFailed => "Validation failed",
            Self::TicketNotFound => "Ticket not found",
            Self::AmbiguousId => "Ambiguous ticket ID",
            Self::DuplicateTicket => "Duplicate ticket number",
            Self::StoreCorrupt => "Ticket store file is corrupt",
            Self::StoreWriteFailed => "Ticket store write failed",
            Self::LockContention => "Lock contention",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `tkt init` to create the ticket store."),
            Self::ConfigParseError => Some("Fix syntax in .ticketime/config.toml and retry."),
            Self::InvalidHoliday => Some("Write holidays as zero-padded YYYY-MM-DD dates."),
            Self::InvalidCalendar => Some(
                "Use HH:MM with day_start before day_end; utc_offset_minutes must be within ±1439.",
            ),
            Self::InvalidCategory => Some("Use one of: fault, requirement, special."),
            Self::InvalidTimestamp => {
                Some("Use RFC 3339 (2024-01-02T09:00:00-05:00) or YYYY-MM-DDTHH:MM.")
            }
            Self::MissingSchedule => Some("Run `tkt reschedule <id> --at <time>` first."),
            Self::ValidationFailed => Some("Check the arguments with `tkt <command> --help`."),
            Self::TicketNotFound => None,
            Self::AmbiguousId => Some("Use a longer ID prefix to disambiguate."),
            Self::DuplicateTicket => Some("Ticket numbers must be unique (case-insensitive)."),
            Self::StoreCorrupt => Some("Restore .ticketime/tickets.json from a backup."),
            Self::StoreWriteFailed => Some("Check disk space and write permissions."),
            Self::LockContention => Some("Retry after the other `tkt` process releases its lock."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failures of the deadline engine and its calendar arithmetic.
///
/// Every variant is a plain value: computation is deterministic, so none of
/// these are worth retrying with the same input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeadlineError {
    #[error("invalid category: '{0}'")]
    InvalidCategory(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("ticket {ticket_number} ({category}) has no scheduled follow-up")]
    MissingSchedule {
        ticket_number: String,
        category: Category,
    },

    #[error("validation failed: {0}")]
    Validation(String),
}

impl DeadlineError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidCategory(_) => ErrorCode::InvalidCategory,
            Self::InvalidTimestamp(_) => ErrorCode::InvalidTimestamp,
            Self::MissingSchedule { .. } => ErrorCode::MissingSchedule,
            Self::Validation(_) => ErrorCode::ValidationFailed,
        }
    }
}
