//! `postbrief` -- scheduled email summary pipeline.
//!
//! Provides the following subcommands:
//!
//! - `postbrief run` -- Start the scheduler loop (fetch, summarize,
//!   store, notify) until interrupted.
//! - `postbrief tick` -- Run a single pipeline tick and exit.
//! - `postbrief status` -- Show configuration status and diagnostics.

use clap::{Parser, Subcommand};

mod commands;

/// postbrief CLI.
#[derive(Parser)]
#[command(name = "postbrief", about = "Scheduled email summary pipeline", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Start the scheduler loop.
    Run(commands::run::RunArgs),

    /// Run a single pipeline tick and exit.
    Tick(commands::tick::TickArgs),

    /// Show configuration status.
    Status(commands::status::StatusArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::init_logging(cli.verbose);

    match cli.command {
        Commands::Run(args) => commands::run::execute(args).await,
        Commands::Tick(args) => commands::tick::execute(args).await,
        Commands::Status(args) => commands::status::execute(args).await,
    }
}
