pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Calendar-aware, dependency-driven batch job scheduler (spec §6 "CLI
/// surface"). Directory roots are taken from the loaded config, not
/// re-specified here (spec.md §3 "Config (input)").
#[derive(Parser, Debug)]
#[command(name = "jobforest")]
#[command(author = "JobForest Team")]
#[command(version = "0.1.0")]
#[command(about = "Calendar-aware, dependency-driven batch job scheduler", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the TOML settings file.
    #[arg(short, long, value_name = "PATH", default_value = "jobforest.toml")]
    pub config: PathBuf,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(name = "main", about = "Run the scheduler loop until end-time or once_only")]
    Main,

    #[command(about = "Print the current JobStatus projection for every family")]
    Status {
        #[arg(long, help = "Emit the status report as JSON instead of a table")]
        json: bool,
    },

    #[command(about = "Preserve a job's current info file and release it for a fresh attempt")]
    Rerun { family: String, job: String },

    #[command(about = "Overwrite a job's error_code, preserving the prior value")]
    Mark { family: String, job: String, code: i32 },

    #[command(about = "Hold a job, overriding its computed status")]
    Hold { family: String, job: String },

    #[command(name = "remove-hold", about = "Clear a job's hold marker")]
    RemoveHold { family: String, job: String },

    #[command(name = "release-dependencies", about = "Release a job, bypassing its dependencies")]
    ReleaseDependencies { family: String, job: String },
}
