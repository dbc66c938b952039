//! `tkt init`: create `.ticketime/` with a default config and an empty store.

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;
use std::fs;
use std::io::Write;
use ticketime_core::TicketStore;
use ticketime_core::config::{STATE_DIR, default_config_toml};
use tracing::info;

use super::Context;
use crate::output::render;

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Overwrite an existing `config.toml` with the defaults.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct InitResult {
    state_dir: String,
    config_path: String,
    config_written: bool,
    store_path: String,
}

/// Execute `tkt init`. Creates:
///
/// ```text
/// .ticketime/
///   config.toml    (calendar + display defaults)
///   tickets.json   (empty store)
///   lock           (advisory lock file)
/// ```
///
/// Re-running is safe: existing tickets are kept, and an existing config is
/// only replaced with `--force`.
pub fn run_init(args: &InitArgs, ctx: &Context) -> anyhow::Result<()> {
    let state_dir = ctx.project_root.join(STATE_DIR);
    fs::create_dir_all(&state_dir)
        .with_context(|| format!("failed to create {}", state_dir.display()))?;

    let config_path = state_dir.join("config.toml");
    let config_written = args.force || !config_path.exists();
    if config_written {
        let body = default_config_toml()?;
        fs::write(&config_path, body)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        info!(path = %config_path.display(), "wrote default config");
    }

    let store = TicketStore::init(&ctx.project_root, ctx.engine())?;

    let result = InitResult {
        state_dir: state_dir.display().to_string(),
        config_path: config_path.display().to_string(),
        config_written,
        store_path: store.data_path().display().to_string(),
    };
    render(ctx.output, &result, |r, w| {
        writeln!(w, "✓ Initialized {STATE_DIR}/")?;
        writeln!(w, "  Store:  {}", r.store_path)?;
        if r.config_written {
            writeln!(w, "  Config: {}", r.config_path)?;
        } else {
            writeln!(w, "  Config: {} (kept)", r.config_path)?;
        }
        writeln!(w)?;
        writeln!(w, "Next: tkt create INC-1 --category fault --case-at 2024-01-02T09:00")
    })
}
