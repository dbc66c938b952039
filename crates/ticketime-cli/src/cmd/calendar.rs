//! `tkt calendar`: inspect the business calendar.
//!
//! Classifies an instant (default: now), shows the next working instant, and
//! optionally walks a number of working minutes forward or backward.

use chrono::{DateTime, FixedOffset, Utc};
use clap::Args;
use serde::Serialize;
use std::io::Write;

use super::Context;
use crate::output::{pretty_kv, pretty_section, render_mode};
use crate::view::format_instant;

#[derive(Args, Debug, Default)]
pub struct CalendarArgs {
    /// Instant to inspect. Defaults to the current instant.
    #[arg(value_name = "INSTANT")]
    pub instant: Option<String>,

    /// Add this many working minutes to the instant.
    #[arg(long, value_name = "MINUTES", conflicts_with = "subtract")]
    pub add: Option<i64>,

    /// Subtract this many working minutes from the instant.
    #[arg(long, value_name = "MINUTES")]
    pub subtract: Option<i64>,

    /// Also list the configured holidays.
    #[arg(long)]
    pub holidays: bool,
}

#[derive(Debug, Serialize)]
struct CalendarReport {
    instant: DateTime<FixedOffset>,
    working: bool,
    next_working: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    walk: Option<Walk>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    holidays: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Walk {
    minutes: i64,
    result: DateTime<FixedOffset>,
}

pub fn run_calendar(args: &CalendarArgs, ctx: &Context) -> anyhow::Result<()> {
    let calendar = ctx.calendar();
    let instant = match args.instant.as_deref() {
        Some(raw) => ctx.parse_instant(raw)?,
        None => ctx.now,
    };
    let local = |t: DateTime<Utc>| t.with_timezone(&calendar.offset());

    let walk = match (args.add, args.subtract) {
        (Some(minutes), _) => Some(Walk {
            minutes,
            result: local(calendar.add_working_minutes(instant, minutes)?),
        }),
        (None, Some(minutes)) => Some(Walk {
            minutes: -minutes,
            result: local(calendar.subtract_working_minutes(instant, minutes)?),
        }),
        (None, None) => None,
    };

    let holidays = if args.holidays {
        calendar
            .holidays()
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect()
    } else {
        Vec::new()
    };

    let report = CalendarReport {
        instant: local(instant),
        working: calendar.is_working_instant(instant),
        next_working: local(calendar.next_working_instant(instant)?),
        walk,
        holidays,
    };

    render_mode(
        ctx.output,
        &report,
        |r, w| {
            write!(
                w,
                "{}\t{}\t{}",
                r.instant.to_rfc3339(),
                if r.working { "working" } else { "closed" },
                r.next_working.to_rfc3339()
            )?;
            if let Some(ref walk) = r.walk {
                write!(w, "\t{:+}\t{}", walk.minutes, walk.result.to_rfc3339())?;
            }
            writeln!(w)?;
            for day in &r.holidays {
                writeln!(w, "holiday\t{day}")?;
            }
            Ok(())
        },
        |r, w| {
            pretty_section(w, "Business calendar")?;
            pretty_kv(w, "Instant", format_instant(Some(r.instant)))?;
            pretty_kv(w, "Working time", if r.working { "yes" } else { "no" })?;
            pretty_kv(w, "Next working", format_instant(Some(r.next_working)))?;
            if let Some(ref walk) = r.walk {
                pretty_kv(
                    w,
                    &format!("{:+} working min", walk.minutes),
                    format_instant(Some(walk.result)),
                )?;
            }
            if !r.holidays.is_empty() {
                pretty_kv(w, "Holidays", r.holidays.join(", "))?;
            }
            Ok(())
        },
    )
}
