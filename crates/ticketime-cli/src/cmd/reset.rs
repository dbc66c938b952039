//! `tkt reset`: restart the recurring follow-up from the current instant.

use clap::Args;

use super::Context;
use crate::output::render_item;

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Ticket id, id prefix, or ticket number.
    pub id: String,
}

pub fn run_reset(args: &ResetArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let entry = store.reset_recurring(&args.id, ctx.now)?;
    render_item(&ctx.view(&entry), ctx.output)?;
    Ok(())
}
