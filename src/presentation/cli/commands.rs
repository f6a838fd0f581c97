//! CLI command implementations
//!
//! Wires each CLI subcommand (spec §6 "CLI surface") to the scheduler's
//! application-level use cases: loads `Config`, constructs the filesystem
//! repositories the domain traits are defined against, and runs the
//! appropriate use case. A `ParseError` from the domain layer prints its
//! canonical message to stderr and maps to a non-zero exit code (spec §7).

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::application::services::run_scheduling_pass;
use crate::application::use_cases::{
    hold_job, mark_job, release_dependencies, remove_hold, rerun_job, run_loop,
};
use crate::domain::repositories::{FamilyRepository as _, TokenDocumentRepository as _, WorldRepository as _};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::config::Config;
use crate::infrastructure::output::{write_status_json, StatusReport};
use crate::infrastructure::repositories::{
    FilesystemFamilyRepository, FilesystemInfoFileRepository, FilesystemMarkerRepository,
    FilesystemTokenDocumentRepository, FilesystemWorldRepository,
};
use crate::infrastructure::worker::LoggingQueueClient;

fn load_config(config_path: &Path) -> Result<Config> {
    Config::load(config_path).map_err(anyhow::Error::from).with_context(|| {
        format!("loading config from {}", config_path.display())
    })
}

/// `main`: runs the scheduler loop (spec §4.6) until `end_time` or, if
/// `once_only`, for exactly one tick.
pub fn run_main(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let clock = SystemClock::new();
    let family_repo = FilesystemFamilyRepository::new(&config, &clock);
    let world_repo = FilesystemWorldRepository::new(&config.log_dir, &config.primary_tz, &clock);
    let marker_repo = FilesystemMarkerRepository::new(&config.log_dir, &config.primary_tz, &clock);
    let token_repo = FilesystemTokenDocumentRepository::new(&config.log_dir);
    let info_repo = FilesystemInfoFileRepository::new(&config.log_dir, &config.primary_tz, &clock);
    let queue_client = LoggingQueueClient;

    let outcomes = run_loop(
        &config,
        &clock,
        &family_repo,
        &world_repo,
        &marker_repo,
        &token_repo,
        &info_repo,
        &queue_client,
    )?;

    info!(ticks = outcomes.len(), "scheduler loop finished");
    Ok(())
}

/// `status [--json]`: recomputes the same join the main loop uses (spec
/// §4.4) and either prints a plain-text table or writes the §6 status JSON
/// shape to stdout. This is a read-only query — it never dispatches a job
/// or commits the staged token document.
pub fn run_status(config_path: &Path, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let clock = SystemClock::new();
    let family_repo = FilesystemFamilyRepository::new(&config, &clock);
    let world_repo = FilesystemWorldRepository::new(&config.log_dir, &config.primary_tz, &clock);
    let marker_repo = FilesystemMarkerRepository::new(&config.log_dir, &config.primary_tz, &clock);
    let token_repo = FilesystemTokenDocumentRepository::new(&config.log_dir);

    let families = family_repo.load_today()?;
    let world = world_repo.load_today()?;
    let token_doc = token_repo.load()?;

    let scheduling =
        run_scheduling_pass(&config, &clock, &families, &world, &marker_repo, &token_doc)?;
    let report = StatusReport::from_flat_list(scheduling.flat_list);

    if json {
        let text = serde_json::to_string_pretty(&report).context("serializing status report")?;
        println!("{text}");
    } else {
        for result in &report.status.flat_list {
            println!(
                "{:<20} {:<24} {:<12} queue={}",
                result.family_name, result.job_name, result.status, result.queue_name
            );
        }
    }
    Ok(())
}

/// Writes the current status report to `path` as JSON (used by the §6
/// "Status JSON" external interface beyond stdout, e.g. a web front-end
/// polling a file).
pub fn write_status_report(config_path: &Path, output_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let clock = SystemClock::new();
    let family_repo = FilesystemFamilyRepository::new(&config, &clock);
    let world_repo = FilesystemWorldRepository::new(&config.log_dir, &config.primary_tz, &clock);
    let marker_repo = FilesystemMarkerRepository::new(&config.log_dir, &config.primary_tz, &clock);
    let token_repo = FilesystemTokenDocumentRepository::new(&config.log_dir);

    let families = family_repo.load_today()?;
    let world = world_repo.load_today()?;
    let token_doc = token_repo.load()?;
    let scheduling =
        run_scheduling_pass(&config, &clock, &families, &world, &marker_repo, &token_doc)?;
    let report = StatusReport::from_flat_list(scheduling.flat_list);
    write_status_json(output_path, &report)
}

/// `rerun FAMILY JOB` (spec §4.8).
pub fn run_rerun(config_path: &Path, family: &str, job: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let clock = SystemClock::new();
    let info_repo = FilesystemInfoFileRepository::new(&config.log_dir, &config.primary_tz, &clock);
    let marker_repo = FilesystemMarkerRepository::new(&config.log_dir, &config.primary_tz, &clock);
    let did_rerun = rerun_job(&info_repo, &marker_repo, family, job)?;
    if did_rerun {
        println!("{family}.{job}: rerun scheduled");
    } else {
        println!("{family}.{job}: still running, nothing to rerun");
    }
    Ok(())
}

/// `mark FAMILY JOB CODE` (spec §4.8).
pub fn run_mark(config_path: &Path, family: &str, job: &str, code: i32) -> Result<()> {
    let config = load_config(config_path)?;
    let clock = SystemClock::new();
    let info_repo = FilesystemInfoFileRepository::new(&config.log_dir, &config.primary_tz, &clock);
    mark_job(&info_repo, &clock, family, job, code)?;
    println!("{family}.{job}: marked error_code={code}");
    Ok(())
}

/// `hold FAMILY JOB` (spec §4.8).
pub fn run_hold(config_path: &Path, family: &str, job: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let clock = SystemClock::new();
    let marker_repo = FilesystemMarkerRepository::new(&config.log_dir, &config.primary_tz, &clock);
    hold_job(&marker_repo, family, job)?;
    println!("{family}.{job}: on hold");
    Ok(())
}

/// `remove_hold FAMILY JOB` (spec §4.8).
pub fn run_remove_hold(config_path: &Path, family: &str, job: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let clock = SystemClock::new();
    let marker_repo = FilesystemMarkerRepository::new(&config.log_dir, &config.primary_tz, &clock);
    remove_hold(&marker_repo, family, job)?;
    println!("{family}.{job}: hold removed");
    Ok(())
}

/// `release_dependencies FAMILY JOB` (spec §4.8).
pub fn run_release_dependencies(config_path: &Path, family: &str, job: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let clock = SystemClock::new();
    let marker_repo = FilesystemMarkerRepository::new(&config.log_dir, &config.primary_tz, &clock);
    release_dependencies(&marker_repo, family, job)?;
    println!("{family}.{job}: released");
    Ok(())
}
