//! `tkt check`: mark one deadline done (or not done with `--undo`).

use clap::Args;
use ticketime_core::DeadlineKind;

use super::Context;
use crate::output::render_item;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Ticket id, id prefix, or ticket number.
    pub id: String,

    /// internal, client, recurring, closing, or expiration.
    pub deadline: String,

    /// Clear the flag instead of setting it.
    #[arg(long)]
    pub undo: bool,
}

pub fn run_check(args: &CheckArgs, ctx: &Context) -> anyhow::Result<()> {
    let kind: DeadlineKind = args.deadline.parse()?;
    let store = ctx.open_store()?;
    let entry = store.set_completed(&args.id, kind, !args.undo)?;
    render_item(&ctx.view(&entry), ctx.output)?;
    Ok(())
}
