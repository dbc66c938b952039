//! `tkt list`: tickets with their expiration status.

use clap::Args;
use ticketime_core::{Category, ListQuery, SortOrder};

use super::Context;
use crate::output::render_list;
use crate::view::TicketView;

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only tickets of this category.
    #[arg(short, long)]
    pub category: Option<String>,

    /// Case-insensitive substring of the ticket number.
    #[arg(short, long)]
    pub search: Option<String>,

    /// number, number-desc, created, or created-desc. Default: insertion order.
    #[arg(long)]
    pub sort: Option<String>,

    /// Only tickets whose case expiration has passed unchecked.
    #[arg(long)]
    pub overdue: bool,
}

impl ListArgs {
    fn query(&self) -> anyhow::Result<ListQuery> {
        let category = self
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()?;
        let sort = self
            .sort
            .as_deref()
            .map(str::parse::<SortOrder>)
            .transpose()?;
        Ok(ListQuery {
            category,
            search: self.search.clone(),
            sort,
        })
    }
}

pub fn run_list(args: &ListArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let views: Vec<TicketView> = store
        .list(&args.query()?)?
        .iter()
        .filter(|entry| !args.overdue || entry.is_overdue(ctx.now))
        .map(|entry| ctx.view(entry))
        .collect();
    render_list(&views, ctx.output)?;
    Ok(())
}
