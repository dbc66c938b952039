pub mod calendar;
pub mod check;
pub mod create;
pub mod delete;
pub mod init;
pub mod list;
pub mod reschedule;
pub mod reset;
pub mod show;
pub mod stats;

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use ticketime_core::config::EffectiveConfig;
use ticketime_core::{BusinessCalendar, DeadlineEngine, TicketEntry, TicketStore};

use crate::output::OutputMode;
use crate::view::TicketView;

/// Everything a command handler needs, resolved once in `main`.
#[derive(Debug)]
pub struct Context {
    pub project_root: PathBuf,
    pub output: OutputMode,
    pub config: EffectiveConfig,
    /// The single clock sample for this invocation.
    pub now: DateTime<Utc>,
}

impl Context {
    #[must_use]
    pub const fn calendar(&self) -> &BusinessCalendar {
        &self.config.calendar
    }

    #[must_use]
    pub fn engine(&self) -> DeadlineEngine {
        DeadlineEngine::new(self.config.calendar.clone())
    }

    pub fn open_store(&self) -> anyhow::Result<TicketStore> {
        Ok(TicketStore::open(&self.project_root, self.engine())?)
    }

    #[must_use]
    pub fn view(&self, entry: &TicketEntry) -> TicketView {
        TicketView::new(
            entry,
            self.calendar(),
            &self.config.zone_label(),
            self.now,
        )
    }

    /// Parse a user-supplied instant in the calendar's zone.
    pub fn parse_instant(&self, raw: &str) -> anyhow::Result<DateTime<Utc>> {
        Ok(self.calendar().parse_instant(raw)?)
    }
}

/// Sample the clock unless `--now` / `TICKETIME_NOW` pins it.
pub fn resolve_now(
    pinned: Option<&str>,
    calendar: &BusinessCalendar,
) -> anyhow::Result<DateTime<Utc>> {
    match pinned {
        Some(raw) => Ok(calendar.parse_instant(raw)?),
        None => Ok(Utc::now()),
    }
}
