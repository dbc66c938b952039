//! `tkt delete`: remove a ticket with its deadlines and flags.

use clap::Args;
use serde::Serialize;
use std::io::Write;

use super::Context;
use crate::output::render;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Ticket id, id prefix, or ticket number.
    pub id: String,
}

#[derive(Debug, Serialize)]
struct DeleteResult {
    id: String,
    ticket_number: String,
    deleted: bool,
}

pub fn run_delete(args: &DeleteArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let removed = store.remove(&args.id)?;
    let result = DeleteResult {
        id: removed.ticket.id,
        ticket_number: removed.ticket.ticket_number,
        deleted: true,
    };
    render(ctx.output, &result, |r, w| {
        writeln!(w, "✓ Deleted {} ({})", r.ticket_number, r.id)
    })
}
