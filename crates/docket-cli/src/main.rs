#![forbid(unsafe_code)]

mod cmd;
mod identity;
mod output;
mod project;

use clap::{CommandFactory, Parser, Subcommand};
use docket_core::config;
use output::OutputMode;
use std::env;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "docket: case and hearing tracker for small legal offices",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Act as this user id (skips env and config resolution).
    #[arg(long, global = true)]
    user: Option<String>,

    /// Only log errors.
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Output mode from `--json`, `FORMAT`, the user config, and the TTY.
    fn output_mode(&self) -> OutputMode {
        let user_output = config::load_user_config()
            .map_err(|err| warn!(error = %err, "ignoring unreadable user config"))
            .ok()
            .and_then(|cfg| cfg.output);
        let env_format = env::var("FORMAT").ok();
        OutputMode::from_resolved(&config::resolve_output(
            self.json,
            user_output.as_deref(),
            env_format.as_deref(),
        ))
    }

    fn user_flag(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Setup",
        about = "Initialize a docket project",
        long_about = "Create .docket/ in the current directory and seed the store.",
        after_help = "EXAMPLES:\n    # Initialize a project in the current directory\n    dk init\n\n    # Emit machine-readable output\n    dk init --json"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Cases",
        about = "Open a new case",
        long_about = "Validate and record a new case with its category billing rate.",
        after_help = "EXAMPLES:\n    # Open a civil case\n    dk create --number 2025-LCM-0003 --title \"Okafor vs Bank\" \\\n        --category civil --subcategory \"Debt Recovery\" --petition-date 2025-09-01"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Cases",
        about = "List cases",
        long_about = "List cases sorted by title, with search and status filters.",
        after_help = "EXAMPLES:\n    # Everything\n    dk list\n\n    # Court cases with a hearing in the next week\n    dk list --status court --adjourn-within 7\n\n    # Search title, suit number, and case number\n    dk list -q acme"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Cases",
        about = "Show one case",
        long_about = "Show full details for a case by id or case number.",
        after_help = "EXAMPLES:\n    dk show case-001\n    dk show 2025-LCM-0001 --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Updates",
        about = "Show a case's update history",
        long_about = "List the updates recorded against one case.",
        after_help = "EXAMPLES:\n    # Newest first\n    dk history 2025-LCM-0001 --sort newest\n\n    # Updates in September mentioning bail\n    dk history case-002 --from 2025-09-01 --to 2025-09-30 -q bail"
    )]
    History(cmd::history::HistoryArgs),

    #[command(
        next_help_heading = "Updates",
        about = "Record a status update",
        long_about = "Record a dated update; its status becomes the case's status.",
        after_help = "EXAMPLES:\n    # Record a hearing outcome\n    dk update 2025-LCM-0001 --date 2025-09-01 --action \"Filed motion\" \\\n        --position \"Motion filed\" --status ongoing --adjourn 2025-09-15\n\n    # Validate without saving\n    dk update case-001 --status completed --adjourn 2030-01-01 --check"
    )]
    Update(cmd::update::UpdateArgs),

    #[command(
        next_help_heading = "Reports",
        about = "Case counts per status",
        after_help = "EXAMPLES:\n    dk stats\n    dk stats --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Reports",
        about = "Cases with latest update and next hearing",
        long_about = "Dashboard of all cases with imminent-hearing alerts.",
        after_help = "EXAMPLES:\n    dk dashboard\n    dk dashboard --sort status"
    )]
    Dashboard(cmd::dashboard::DashboardArgs),

    #[command(
        next_help_heading = "Reminders",
        about = "Run one reminder scan",
        long_about = "Emit one notice per case with a hearing in the reminder window.",
        after_help = "EXAMPLES:\n    dk reminders\n    dk reminders --no-notify"
    )]
    Reminders(cmd::reminders::RemindersArgs),

    #[command(
        next_help_heading = "Reminders",
        about = "List upcoming adjournments",
        long_about = "List every adjournment in the upcoming window, soonest first.",
        after_help = "EXAMPLES:\n    dk upcoming\n    dk upcoming --json"
    )]
    Upcoming(cmd::upcoming::UpcomingArgs),

    #[command(
        next_help_heading = "Reminders",
        about = "Scan for reminders on an interval",
        long_about = "Run reminder scans on a fixed interval until interrupted.",
        after_help = "EXAMPLES:\n    # Scan every 30 seconds\n    dk watch\n\n    # Three scans, one second apart\n    dk watch --interval 1 --ticks 3"
    )]
    Watch(cmd::watch::WatchArgs),

    #[command(
        next_help_heading = "Setup",
        about = "List or switch users",
        after_help = "EXAMPLES:\n    dk users\n    dk users switch u_lawyer"
    )]
    Users {
        #[command(subcommand)]
        command: Option<cmd::users::UsersCommand>,
    },

    #[command(
        next_help_heading = "Data",
        about = "Export raw collections as JSON",
        after_help = "EXAMPLES:\n    dk export --output backup.json"
    )]
    Export(cmd::export::ExportArgs),

    #[command(
        next_help_heading = "Data",
        about = "Import collections from an export",
        long_about = "Overwrite each collection present in the file, then reload.",
        after_help = "EXAMPLES:\n    dk import backup.json"
    )]
    Import(cmd::import::ImportArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    dk completions bash\n    dk completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("DOCKET_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if quiet {
            "error"
        } else if verbose || env::var("DEBUG").is_ok() {
            "docket=debug,info"
        } else {
            "docket=info,warn"
        })
    });

    let format = env::var("DOCKET_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

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

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    debug!(command = ?cli.command, "starting");

    let project_root = env::current_dir()?;
    let output = cli.output_mode();
    let user = cli.user_flag();

    match &cli.command {
        Commands::Init(args) => cmd::init::run_init(args, output, &project_root),
        Commands::Create(args) => cmd::create::run_create(args, user, output, &project_root),
        Commands::List(args) => cmd::list::run_list(args, output, &project_root),
        Commands::Show(args) => cmd::show::run_show(args, output, &project_root),
        Commands::History(args) => cmd::history::run_history(args, output, &project_root),
        Commands::Update(args) => cmd::update::run_update(args, user, output, &project_root),
        Commands::Stats(args) => cmd::stats::run_stats(args, output, &project_root),
        Commands::Dashboard(args) => cmd::dashboard::run_dashboard(args, output, &project_root),
        Commands::Reminders(args) => cmd::reminders::run_reminders(args, output, &project_root),
        Commands::Upcoming(args) => cmd::upcoming::run_upcoming(args, output, &project_root),
        Commands::Watch(args) => cmd::watch::run_watch(args, output, &project_root),
        Commands::Users { command } => {
            cmd::users::run_users(command.as_ref(), user, output, &project_root)
        }
        Commands::Export(args) => cmd::export::run_export(args, output, &project_root),
        Commands::Import(args) => cmd::import::run_import(args, output, &project_root),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
