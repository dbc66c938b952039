#![forbid(unsafe_code)]

mod cmd;
mod output;
mod view;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::Path;
use ticketime_core::config::{EffectiveConfig, ProjectConfig, resolve_config, resolve_with_project};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tkt: SLA follow-up deadlines for support tickets",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (alias for `--format json`).
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Pin the current instant instead of reading the clock.
    #[arg(long, global = true, env = "TICKETIME_NOW", value_name = "INSTANT")]
    now: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Setup",
        about = "Initialize a ticketime project",
        long_about = "Create .ticketime/ with a default config.toml and an empty ticket store.",
        after_help = "EXAMPLES:\n    # Initialize in the current directory\n    tkt init\n\n    # Reset config.toml to defaults, keeping tickets\n    tkt init --force"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Register a ticket",
        long_about = "Register a ticket and compute its five follow-up deadlines.\n\nInstants accept RFC 3339 (2024-01-02T09:00:00-05:00), YYYY-MM-DDTHH:MM in the calendar zone, or epoch milliseconds.",
        after_help = "EXAMPLES:\n    # A fault opened at 09:00\n    tkt create INC-1 --category fault --case-at 2024-01-02T09:00\n\n    # A requirement whose task was opened later\n    tkt create REQ-7 -c requirement --case-at 2024-01-05T18:00 --task-at 2024-01-05T18:20\n\n    # A special ticket with its follow-up already scheduled\n    tkt create SP-3 -c special --case-at 2024-01-02T09:00 --scheduled 2024-01-03T10:00"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "List tickets",
        long_about = "List tickets with optional category filter, number search, and sort order.",
        after_help = "EXAMPLES:\n    # Everything, in insertion order\n    tkt list\n\n    # Faults sorted by number\n    tkt list --category fault --sort number\n\n    # Overdue tickets as JSON\n    tkt list --overdue --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Show one ticket",
        long_about = "Show a ticket with every deadline and its countdown.",
        after_help = "EXAMPLES:\n    # By ticket number\n    tkt show INC-1\n\n    # By id prefix\n    tkt show a1b2"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Deadlines",
        about = "Mark a deadline done",
        long_about = "Mark one deadline of a ticket as done, or clear it with --undo.",
        after_help = "EXAMPLES:\n    # Client follow-up done\n    tkt check INC-1 client\n\n    # Undo\n    tkt check INC-1 client --undo"
    )]
    Check(cmd::check::CheckArgs),

    #[command(
        next_help_heading = "Deadlines",
        about = "Restart the recurring follow-up",
        long_about = "Recompute the recurring follow-up from the current instant and clear its done flag.",
        after_help = "EXAMPLES:\n    # Reset after calling the client\n    tkt reset INC-1"
    )]
    Reset(cmd::reset::ResetArgs),

    #[command(
        next_help_heading = "Deadlines",
        about = "Move a special ticket's follow-up",
        long_about = "Set a new scheduled follow-up for a special ticket. The time must lie after the current instant; all deadlines are recomputed and all done flags cleared.",
        after_help = "EXAMPLES:\n    # Follow up tomorrow at 10:00\n    tkt reschedule SP-3 --at 2024-01-03T10:00"
    )]
    Reschedule(cmd::reschedule::RescheduleArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Delete a ticket",
        long_about = "Delete a ticket together with its deadlines and done flags.",
        after_help = "EXAMPLES:\n    tkt delete INC-1"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Reports",
        about = "Ticket counts",
        long_about = "Count tickets per category, unscheduled special tickets, and overdue tickets.",
        after_help = "EXAMPLES:\n    tkt stats\n    tkt stats --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Reports",
        about = "Inspect the business calendar",
        long_about = "Classify an instant as working or closed time, show the next working instant, and optionally add or subtract working minutes.",
        after_help = "EXAMPLES:\n    # Is it working time right now?\n    tkt calendar\n\n    # 240 working minutes after Friday 16:00\n    tkt calendar 2024-01-05T16:00 --add 240\n\n    # Show configured holidays\n    tkt calendar --holidays"
    )]
    Calendar(cmd::calendar::CalendarArgs),
}

impl Commands {
    /// `init --force` replaces the project config, so it must not depend on
    /// that file being readable.
    const fn rewrites_project_config(&self) -> bool {
        matches!(self, Self::Init(args) if args.force)
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TICKETIME_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "ticketime=debug,info"
        } else {
            "ticketime=info,warn"
        })
    });

    let format = env::var("TICKETIME_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: Cli, config: EffectiveConfig, output: OutputMode, root: &Path) -> anyhow::Result<()> {
    let now = cmd::resolve_now(cli.now.as_deref(), &config.calendar)?;
    debug!(%now, "resolved current instant");

    let ctx = cmd::Context {
        project_root: root.to_path_buf(),
        output,
        config,
        now,
    };

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, &ctx),
        Commands::Create(args) => cmd::create::run_create(args, &ctx),
        Commands::List(ref args) => cmd::list::run_list(args, &ctx),
        Commands::Show(ref args) => cmd::show::run_show(args, &ctx),
        Commands::Check(ref args) => cmd::check::run_check(args, &ctx),
        Commands::Reset(ref args) => cmd::reset::run_reset(args, &ctx),
        Commands::Reschedule(ref args) => cmd::reschedule::run_reschedule(args, &ctx),
        Commands::Delete(ref args) => cmd::delete::run_delete(args, &ctx),
        Commands::Stats(ref args) => cmd::stats::run_stats(args, &ctx),
        Commands::Calendar(ref args) => cmd::calendar::run_calendar(args, &ctx),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let config = if cli.command.rewrites_project_config() {
        debug!("skipping project config; init --force rewrites it");
        resolve_with_project(ProjectConfig::default(), cli.json)
    } else {
        resolve_config(&project_root, cli.json)
    };
    let output = resolve_output_mode(
        cli.format,
        cli.json,
        config.as_ref().ok().map(|c| c.resolved_output.as_str()),
    );

    let result = config
        .map_err(anyhow::Error::from)
        .and_then(|config| run(cli, config, output, &project_root));

    if let Err(err) = result {
        render_error(output, &CliError::from(&err))?;
        std::process::exit(1);
    }
    Ok(())
}
