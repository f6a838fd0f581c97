use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use jobforest::presentation::cli::commands;
use jobforest::presentation::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("jobforest=debug,info")
    } else {
        EnvFilter::new("jobforest=info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match &cli.command {
        Commands::Main => commands::run_main(&cli.config),
        Commands::Status { json } => commands::run_status(&cli.config, *json),
        Commands::Rerun { family, job } => commands::run_rerun(&cli.config, family, job),
        Commands::Mark { family, job, code } => commands::run_mark(&cli.config, family, job, *code),
        Commands::Hold { family, job } => commands::run_hold(&cli.config, family, job),
        Commands::RemoveHold { family, job } => commands::run_remove_hold(&cli.config, family, job),
        Commands::ReleaseDependencies { family, job } => {
            commands::run_release_dependencies(&cli.config, family, job)
        }
    }
}
