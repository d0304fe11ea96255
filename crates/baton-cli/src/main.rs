mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, issue::IssueSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "baton",
    about = "Workflow dispatch engine — classify requests, plan stages, run them in order",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .baton/ or .git/)
    #[arg(long, global = true, env = "BATON_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize baton in the current project
    Init,

    /// Classify a request, plan its stages, and execute them in order
    Run {
        /// Request text, e.g. "Fix the login bug"
        text: String,
    },

    /// Classify a request without running anything
    Classify {
        /// Request text
        text: String,
    },

    /// Show the stage plan a request would execute
    Plan {
        /// Request text
        text: String,
    },

    /// Show the project snapshot (docs, prior runs, open issues)
    Status,

    /// List recorded workflow runs
    History {
        /// Show only the N most recent runs
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Manage the known-issues log
    Issue {
        #[command(subcommand)]
        subcommand: IssueSubcommand,
    },

    /// Validate and inspect the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Run { text } => cmd::run::run(&root, &text, cli.json),
        Commands::Classify { text } => cmd::classify::run(&root, &text, cli.json),
        Commands::Plan { text } => cmd::plan::run(&root, &text, cli.json),
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::History { limit } => cmd::history::run(&root, limit, cli.json),
        Commands::Issue { subcommand } => cmd::issue::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
