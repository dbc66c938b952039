//! `tkt show`: one ticket with all five deadlines and their countdowns.
//!
//! The ticket can be named by id, unique id prefix (`a1b2` → `tk-a1b2…`), or
//! ticket number.

use clap::Args;

use super::Context;
use crate::output::render_item;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Ticket id, id prefix, or ticket number.
    pub id: String,
}

pub fn run_show(args: &ShowArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let entry = store.get(&args.id)?;
    render_item(&ctx.view(&entry), ctx.output)?;
    Ok(())
}
