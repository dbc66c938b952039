use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::DeadlineError;

/// The five named follow-up deadlines, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineKind {
    InternalFollowUp,
    ClientFollowUp,
    RecurringFollowUp,
    ClosingFollowUp,
    CaseExpiration,
}

impl DeadlineKind {
    pub const ALL: [Self; 5] = [
        Self::InternalFollowUp,
        Self::ClientFollowUp,
        Self::RecurringFollowUp,
        Self::ClosingFollowUp,
        Self::CaseExpiration,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InternalFollowUp => "internal_follow_up",
            Self::ClientFollowUp => "client_follow_up",
            Self::RecurringFollowUp => "recurring_follow_up",
            Self::ClosingFollowUp => "closing_follow_up",
            Self::CaseExpiration => "case_expiration",
        }
    }

    /// Human label used by pretty output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InternalFollowUp => "Internal follow-up",
            Self::ClientFollowUp => "Client follow-up",
            Self::RecurringFollowUp => "Recurring follow-up",
            Self::ClosingFollowUp => "Closing follow-up",
            Self::CaseExpiration => "Case expiration",
        }
    }
}

impl fmt::Display for DeadlineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeadlineKind {
    type Err = DeadlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "internal_follow_up" | "internal" => Ok(Self::InternalFollowUp),
            "client_follow_up" | "client" => Ok(Self::ClientFollowUp),
            "recurring_follow_up" | "recurring" => Ok(Self::RecurringFollowUp),
            "closing_follow_up" | "closing" => Ok(Self::ClosingFollowUp),
            "case_expiration" | "expiration" => Ok(Self::CaseExpiration),
            _ => Err(DeadlineError::Validation(format!(
                "unknown deadline '{s}' (expected one of: internal, client, recurring, closing, expiration)"
            ))),
        }
    }
}

/// Target instants derived for one ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineSet {
    pub internal_follow_up: DateTime<Utc>,
    pub client_follow_up: DateTime<Utc>,
    pub closing_follow_up: DateTime<Utc>,
    pub case_expiration: DateTime<Utc>,
    pub recurring_follow_up: DateTime<Utc>,
}

impl DeadlineSet {
    #[must_use]
    pub const fn get(&self, kind: DeadlineKind) -> DateTime<Utc> {
        match kind {
            DeadlineKind::InternalFollowUp => self.internal_follow_up,
            DeadlineKind::ClientFollowUp => self.client_follow_up,
            DeadlineKind::RecurringFollowUp => self.recurring_follow_up,
            DeadlineKind::ClosingFollowUp => self.closing_follow_up,
            DeadlineKind::CaseExpiration => self.case_expiration,
        }
    }

    /// Copy with only the recurring follow-up replaced.
    #[must_use]
    pub const fn with_recurring(mut self, recurring: DateTime<Utc>) -> Self {
        self.recurring_follow_up = recurring;
        self
    }
}

/// Caller-owned "done" flags, one per deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionState {
    pub internal_follow_up: bool,
    pub client_follow_up: bool,
    pub recurring_follow_up: bool,
    pub closing_follow_up: bool,
    pub case_expiration: bool,
}

impl CompletionState {
    #[must_use]
    pub const fn is_completed(&self, kind: DeadlineKind) -> bool {
        match kind {
            DeadlineKind::InternalFollowUp => self.internal_follow_up,
            DeadlineKind::ClientFollowUp => self.client_follow_up,
            DeadlineKind::RecurringFollowUp => self.recurring_follow_up,
            DeadlineKind::ClosingFollowUp => self.closing_follow_up,
            DeadlineKind::CaseExpiration => self.case_expiration,
        }
    }

    pub const fn set(&mut self, kind: DeadlineKind, completed: bool) {
        let slot = match kind {
            DeadlineKind::InternalFollowUp => &mut self.internal_follow_up,
            DeadlineKind::ClientFollowUp => &mut self.client_follow_up,
            DeadlineKind::RecurringFollowUp => &mut self.recurring_follow_up,
            DeadlineKind::ClosingFollowUp => &mut self.closing_follow_up,
            DeadlineKind::CaseExpiration => &mut self.case_expiration,
        };
        *slot = completed;
    }

    pub const fn clear(&mut self) {
        *self = Self {
            internal_follow_up: false,
            client_follow_up: false,
            recurring_follow_up: false,
            closing_follow_up: false,
            case_expiration: false,
        };
    }
}
