//! `tkt create`: register a ticket and compute its deadlines.

use clap::Args;
use ticketime_core::TicketDraft;

use super::Context;
use crate::output::render_item;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Ticket number as used by the tracking system (unique, case-insensitive).
    pub number: String,

    /// fault, requirement, or special.
    #[arg(short, long)]
    pub category: String,

    /// When the case was opened.
    #[arg(long = "case-at", value_name = "INSTANT")]
    pub case_at: String,

    /// When the task was opened. Defaults to the case instant.
    #[arg(long = "task-at", value_name = "INSTANT")]
    pub task_at: Option<String>,

    /// Follow-up time for special tickets. Must lie after the current instant.
    #[arg(long, value_name = "INSTANT")]
    pub scheduled: Option<String>,
}

impl CreateArgs {
    fn into_draft(self) -> TicketDraft {
        let task_created_at = self.task_at.unwrap_or_else(|| self.case_at.clone());
        TicketDraft {
            ticket_number: self.number,
            category: self.category,
            case_created_at: self.case_at,
            task_created_at,
            scheduled_follow_up: self.scheduled,
        }
    }
}

pub fn run_create(args: CreateArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let entry = store.create(args.into_draft(), ctx.now)?;
    render_item(&ctx.view(&entry), ctx.output)?;
    Ok(())
}
