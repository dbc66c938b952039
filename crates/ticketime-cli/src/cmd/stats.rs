//! `tkt stats`: ticket counts per category.

use clap::Args;
use std::io::Write;

use super::Context;
use crate::output::{pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug, Default)]
pub struct StatsArgs {}

pub fn run_stats(_args: &StatsArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let stats = store.stats(ctx.now)?;
    render_mode(
        ctx.output,
        &stats,
        |s, w| {
            writeln!(
                w,
                "total={} fault={} requirement={} special={} unscheduled={} overdue={}",
                s.total, s.fault, s.requirement, s.special, s.unscheduled, s.overdue
            )
        },
        |s, w| {
            pretty_section(w, "Tickets")?;
            pretty_kv(w, "Total", s.total.to_string())?;
            pretty_kv(w, "Fault", s.fault.to_string())?;
            pretty_kv(w, "Requirement", s.requirement.to_string())?;
            pretty_kv(w, "Special", s.special.to_string())?;
            pretty_kv(w, "Unscheduled", s.unscheduled.to_string())?;
            pretty_kv(w, "Overdue", s.overdue.to_string())
        },
    )
}
