//! Main loop
//!
//! The tick cadence, end-of-day termination, and startup reconciliation
//! that drive `run_tick` (spec §4.6). `run_once` and `run_forever` are
//! split out so the `main` CLI command can honor `once_only` without
//! duplicating the startup sequence.

use anyhow::Result;
use chrono::Timelike;
use tracing::info;

use crate::application::services::token_store::reconcile;
use crate::application::use_cases::run_tick::{run_tick, TickOutcome};
use crate::domain::clock::Clock;
use crate::domain::repositories::{
    FamilyRepository, InfoFileRepository, MarkerRepository, TokenDocumentRepository,
    WorldRepository,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::worker::QueueClient;

/// Reconciles the token document against today's world projection (spec
/// §4.6 "Startup sequence"). Drops any holder whose info file is missing or
/// already terminal, then commits. Idempotent: running it twice in a row is
/// a no-op the second time.
pub fn reconcile_token_usage(
    token_repo: &dyn TokenDocumentRepository,
    world_repo: &dyn WorldRepository,
) -> Result<()> {
    let doc = token_repo.load()?;
    let world = world_repo.load_today()?;
    let reconciled = reconcile(doc, &world);
    token_repo.save(if reconciled.is_empty() { None } else { Some(&reconciled) })
}

/// Minutes-since-midnight for the given hour/minute, used to compare
/// "now" against the configured end time (spec §4.6 step 7).
fn minutes_of_day(hour: u32, minute: u32) -> u32 {
    hour * 60 + minute
}

/// Whether `now` (in `primary_tz`) is at or past the configured end time.
fn past_end_time(config: &Config, clock: &dyn Clock) -> Result<bool> {
    let tz = crate::domain::clock::parse_tz(&config.primary_tz)
        .ok_or_else(|| anyhow::anyhow!("unknown primary_tz {}", config.primary_tz))?;
    let now = clock.now(tz);
    let now_minutes = minutes_of_day(now.hour(), now.minute());
    let end_minutes = minutes_of_day(config.end_time_hr, config.end_time_min);
    Ok(now_minutes >= end_minutes)
}

/// Sleeps until the next 10-second wall-clock boundary (spec §4.6 step 7:
/// `10 − (now.sec mod 10)`).
fn sleep_to_next_boundary(config: &Config, clock: &dyn Clock) {
    let tz = crate::domain::clock::parse_tz(&config.primary_tz).unwrap_or(chrono_tz::UTC);
    let now = clock.now(tz);
    let remainder = now.second() % 10;
    let wait = if remainder == 0 { 10 } else { 10 - remainder };
    clock.sleep(std::time::Duration::from_secs(wait as u64));
}

#[allow(clippy::too_many_arguments)]
pub fn run_loop(
    config: &Config,
    clock: &dyn Clock,
    family_repo: &dyn FamilyRepository,
    world_repo: &dyn WorldRepository,
    marker_repo: &dyn MarkerRepository,
    token_repo: &dyn TokenDocumentRepository,
    info_repo: &dyn InfoFileRepository,
    queue_client: &dyn QueueClient,
) -> Result<Vec<TickOutcome>> {
    reconcile_token_usage(token_repo, world_repo)?;

    let mut outcomes = Vec::new();
    loop {
        let outcome = run_tick(
            config,
            clock,
            family_repo,
            world_repo,
            marker_repo,
            token_repo,
            info_repo,
            queue_client,
        )?;
        info!(dispatched = outcome.dispatched, "tick complete");
        outcomes.push(outcome);

        if config.once_only {
            break;
        }

        sleep_to_next_boundary(config, clock);
        if past_end_time(config, clock)? {
            break;
        }
    }
    Ok(outcomes)
}
