use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::calendar::BusinessCalendar;
use crate::error::DeadlineError;

/// Ticket category; selects which deadline rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Outage-style tickets. Wall-clock arithmetic only.
    Fault,
    /// Service requests. Business hours apply when opened after hours.
    Requirement,
    /// Tickets driven by a manually scheduled follow-up.
    Special,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::Fault, Self::Requirement, Self::Special];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fault => "fault",
            Self::Requirement => "requirement",
            Self::Special => "special",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DeadlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            // second label of each pair is the legacy spelling from imported trackers
            "fault" | "falla" => Ok(Self::Fault),
            "requirement" | "requerimiento" => Ok(Self::Requirement),
            "special" | "especial" => Ok(Self::Special),
            _ => Err(DeadlineError::InvalidCategory(s.to_string())),
        }
    }
}

/// A support ticket as stored.
///
/// Everything except `scheduled_follow_up` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub ticket_number: String,
    pub category: Category,
    pub case_created_at: DateTime<Utc>,
    pub task_created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_follow_up: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Copy of this ticket with a new scheduled follow-up.
    #[must_use]
    pub fn with_schedule(&self, scheduled: DateTime<Utc>) -> Self {
        Self {
            scheduled_follow_up: Some(scheduled),
            ..self.clone()
        }
    }

    /// Case-insensitive ticket number comparison key.
    #[must_use]
    pub fn number_key(&self) -> String {
        self.ticket_number.trim().to_lowercase()
    }
}

/// Unvalidated ticket input, as typed by a user or read from an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDraft {
    pub ticket_number: String,
    pub category: String,
    pub case_created_at: String,
    pub task_created_at: String,
    #[serde(default)]
    pub scheduled_follow_up: Option<String>,
}

impl TicketDraft {
    /// Validate the draft into a [`Ticket`] with the given id.
    ///
    /// Timestamps without an explicit offset are read in the calendar's zone.
    pub fn into_ticket(
        self,
        id: String,
        calendar: &BusinessCalendar,
    ) -> Result<Ticket, DeadlineError> {
        let ticket_number = self.ticket_number.trim().to_string();
        if ticket_number.is_empty() {
            return Err(DeadlineError::Validation(
                "ticket number must not be empty".to_string(),
            ));
        }

        let category: Category = self.category.parse()?;
        let case_created_at = calendar.parse_instant(&self.case_created_at)?;
        let task_created_at = calendar.parse_instant(&self.task_created_at)?;
        let scheduled_follow_up = match self.scheduled_follow_up.as_deref() {
            Some(raw) if category == Category::Special => Some(calendar.parse_instant(raw)?),
            Some(_) => {
                return Err(DeadlineError::Validation(format!(
                    "only special tickets take a scheduled follow-up, not {category}"
                )));
            }
            None => None,
        };

        Ok(Ticket {
            id,
            ticket_number,
            category,
            case_created_at,
            task_created_at,
            scheduled_follow_up,
        })
    }
}

/// Derive a short, stable ticket id (`tk-xxxxxxxx`).
///
/// `salt` disambiguates re-created tickets that reuse a number.
#[must_use]
pub fn derive_ticket_id(ticket_number: &str, created: DateTime<Utc>, salt: u64) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(ticket_number.trim().to_lowercase().as_bytes());
    hasher.update(&created.timestamp_micros().to_le_bytes());
    hasher.update(&salt.to_le_bytes());
    let hex = hasher.finalize().to_hex();
    format!("tk-{}", &hex.as_str()[..8])
}
