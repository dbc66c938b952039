//! Display model for a stored ticket and its countdowns.
//!
//! Instants are shown in the calendar's fixed zone; JSON carries RFC 3339
//! with the same offset so scripts see what humans see.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::io::{self, Write};
use ticketime_core::{BusinessCalendar, Countdown, DeadlineKind, TicketEntry};

use crate::output::{Renderable, pretty_kv, pretty_rule, pretty_section};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Serialize)]
pub struct DeadlineView {
    pub kind: DeadlineKind,
    pub at: Option<DateTime<FixedOffset>>,
    pub completed: bool,
    pub countdown: Countdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketView {
    pub id: String,
    pub ticket_number: String,
    pub category: String,
    pub case_created_at: DateTime<FixedOffset>,
    pub task_created_at: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_follow_up: Option<DateTime<FixedOffset>>,
    pub overdue: bool,
    pub deadlines: Vec<DeadlineView>,
    #[serde(skip)]
    zone_label: String,
}

impl TicketView {
    #[must_use]
    pub fn new(
        entry: &TicketEntry,
        calendar: &BusinessCalendar,
        zone_label: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let local = |t: DateTime<Utc>| t.with_timezone(&calendar.offset());
        let deadlines = entry
            .countdowns(now)
            .into_iter()
            .map(|(kind, countdown)| DeadlineView {
                kind,
                at: entry.deadline(kind).map(local),
                completed: entry.completed.is_completed(kind),
                countdown,
            })
            .collect();

        Self {
            id: entry.ticket.id.clone(),
            ticket_number: entry.ticket.ticket_number.clone(),
            category: entry.ticket.category.to_string(),
            case_created_at: local(entry.ticket.case_created_at),
            task_created_at: local(entry.ticket.task_created_at),
            scheduled_follow_up: entry.ticket.scheduled_follow_up.map(local),
            overdue: entry.is_overdue(now),
            deadlines,
            zone_label: zone_label.to_string(),
        }
    }

    fn deadline(&self, kind: DeadlineKind) -> Option<&DeadlineView> {
        self.deadlines.iter().find(|d| d.kind == kind)
    }

    /// The first deadline still running, in display order.
    fn next_pending(&self) -> Option<&DeadlineView> {
        self.deadlines
            .iter()
            .find(|d| matches!(d.countdown, Countdown::Pending { .. }))
    }
}

#[must_use]
pub fn format_instant(at: Option<DateTime<FixedOffset>>) -> String {
    at.map_or_else(|| "-".to_string(), |t| t.format(DISPLAY_FORMAT).to_string())
}

impl Renderable for TicketView {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        pretty_section(
            w,
            &format!("{}  {} ({})", self.id, self.ticket_number, self.category),
        )?;
        pretty_kv(w, "Case created", format_instant(Some(self.case_created_at)))?;
        pretty_kv(w, "Task created", format_instant(Some(self.task_created_at)))?;
        if self.scheduled_follow_up.is_some() {
            pretty_kv(w, "Scheduled follow-up", format_instant(self.scheduled_follow_up))?;
        }
        pretty_kv(w, "Zone", &self.zone_label)?;
        writeln!(w)?;
        for d in &self.deadlines {
            let mark = if d.completed { "[x]" } else { "[ ]" };
            writeln!(
                w,
                "  {mark} {:<20} {:<16}  {}",
                d.kind.label(),
                format_instant(d.at),
                d.countdown
            )?;
        }
        pretty_rule(w)
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(&mut *w, self).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let expiration = self.deadline(DeadlineKind::CaseExpiration);
        let next = self
            .next_pending()
            .map_or_else(|| "-".to_string(), |d| format!("{}={}", d.kind, d.countdown));
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.id,
            self.ticket_number,
            self.category,
            format_instant(expiration.and_then(|d| d.at)),
            expiration.map_or("-", |d| d.countdown.status()),
            next
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["ID", "NUMBER", "CATEGORY", "EXPIRES", "STATUS", "NEXT"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketime_core::{CompletionState, DeadlineEngine, TicketDraft};

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .expect("valid rfc3339")
            .with_timezone(&Utc)
    }

    fn fault_entry() -> TicketEntry {
        let engine = DeadlineEngine::default();
        let ticket = TicketDraft {
            ticket_number: "INC-1".to_string(),
            category: "fault".to_string(),
            case_created_at: "2024-01-02T09:00".to_string(),
            task_created_at: "2024-01-02T09:05".to_string(),
            scheduled_follow_up: None,
        }
        .into_ticket("tk-abcdef12".to_string(), engine.calendar())
        .expect("ticket");
        let deadlines = engine.compute_deadlines(&ticket).expect("deadlines");
        TicketEntry {
            ticket,
            deadlines: Some(deadlines),
            completed: CompletionState::default(),
        }
    }

    #[test]
    fn view_uses_calendar_zone() {
        let calendar = BusinessCalendar::default();
        let view = TicketView::new(&fault_entry(), &calendar, "UTC-05:00", at("2024-01-02T14:00:00Z"));
        assert_eq!(view.case_created_at.to_rfc3339(), "2024-01-02T09:00:00-05:00");
        let expiration = view.deadline(DeadlineKind::CaseExpiration).expect("expiration");
        assert_eq!(format_instant(expiration.at), "2024-01-02 11:00");
    }

    #[test]
    fn text_row_reports_expiration_and_next_pending() {
        let calendar = BusinessCalendar::default();
        // 09:32 local: internal (09:35) and client (09:40) still pending.
        let view = TicketView::new(&fault_entry(), &calendar, "UTC-05:00", at("2024-01-02T14:32:00Z"));
        let mut buf = Vec::new();
        view.render_table(&mut buf).expect("row");
        let row = String::from_utf8(buf).expect("utf8");
        assert_eq!(
            row,
            "tk-abcdef12\tINC-1\tfault\t2024-01-02 11:00\tpending\tinternal_follow_up=0h 3m\n"
        );
    }

    #[test]
    fn json_is_single_line_with_status_tags() {
        let calendar = BusinessCalendar::default();
        let view = TicketView::new(&fault_entry(), &calendar, "UTC-05:00", at("2024-01-02T17:00:00Z"));
        let mut buf = Vec::new();
        view.render_json(&mut buf).expect("json");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(text.lines().count(), 1);
        assert!(text.ends_with('}'), "newline belongs to the output layer");

        let value: serde_json::Value = serde_json::from_str(&text).expect("parse");
        assert_eq!(value["overdue"], true);
        assert_eq!(value["deadlines"][4]["kind"], "case_expiration");
        assert_eq!(value["deadlines"][4]["countdown"]["status"], "expired");
        assert!(value.get("zone_label").is_none());
    }

    #[test]
    fn pretty_output_names_the_zone() {
        let calendar = BusinessCalendar::default();
        let view = TicketView::new(&fault_entry(), &calendar, "UTC+01:00", at("2024-01-02T14:00:00Z"));
        let mut buf = Vec::new();
        view.render_human(&mut buf).expect("pretty");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("Zone:"), "{text}");
        assert!(text.contains("UTC+01:00"), "{text}");
    }
}
