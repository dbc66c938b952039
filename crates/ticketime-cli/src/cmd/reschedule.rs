//! `tkt reschedule`: move a special ticket's follow-up.
//!
//! Replaces the whole deadline set and clears every completion flag. A time
//! at or before the current instant is rejected and nothing is stored.

use clap::Args;

use super::Context;
use crate::output::render_item;

#[derive(Args, Debug)]
pub struct RescheduleArgs {
    /// Ticket id, id prefix, or ticket number.
    pub id: String,

    /// New follow-up time.
    #[arg(long, value_name = "INSTANT")]
    pub at: String,
}

pub fn run_reschedule(args: &RescheduleArgs, ctx: &Context) -> anyhow::Result<()> {
    let scheduled = ctx.parse_instant(&args.at)?;
    let store = ctx.open_store()?;
    let entry = store.reschedule(&args.id, scheduled, ctx.now)?;
    render_item(&ctx.view(&entry), ctx.output)?;
    Ok(())
}
