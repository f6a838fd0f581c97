//! Scheduling engine
//!
//! Joins the parsed family graph against the on-disk world projection to
//! produce a `JobStatus` per job, then runs the token pass that downgrades
//! some `Ready` jobs to `TokenWait` (spec §4.4).

use std::collections::HashMap;

use anyhow::Result;
use chrono::Datelike;

use crate::application::services::token_store::consume_tokens_from_doc;
use crate::domain::clock::Clock;
use crate::domain::entities::{Calendar, Family, JobResult, JobStatus, TokenHolder};
use crate::domain::repositories::MarkerRepository;
use crate::domain::world::World;
use crate::infrastructure::config::Config;

/// The scheduling engine's output for one tick: the joined status list (both
/// representations are derived from it by the caller/status-JSON layer) and
/// the token document staged by the token pass, to be committed only if the
/// tick actually dispatches something (spec §4.4, §4.6 step 4).
pub struct SchedulingResult {
    pub flat_list: Vec<JobResult>,
    pub staged_token_doc: Vec<TokenHolder>,
}

/// Runs one scheduling pass over every family due to run today (spec §4.4).
/// `token_doc` is the document read at the start of the tick; the returned
/// `staged_token_doc` reflects every successful token consumption from the
/// Ready-job pass, applied in family-then-job-name order.
pub fn run_scheduling_pass(
    config: &Config,
    clock: &dyn Clock,
    families: &[Family],
    world: &World,
    markers: &dyn MarkerRepository,
    token_doc: &[TokenHolder],
) -> Result<SchedulingResult> {
    let tz = crate::domain::clock::parse_tz(&config.primary_tz)
        .ok_or_else(|| anyhow::anyhow!("unknown primary_tz {}", config.primary_tz))?;
    let now = clock.now(tz);
    let (year, month, day) = (now.year(), now.month(), now.day());
    let weekday = now.weekday();

    let calendars: HashMap<String, Calendar> = config
        .calendars
        .iter()
        .map(|(name, rules)| (name.clone(), Calendar::new(name.clone(), rules.clone())))
        .collect();

    let mut sorted_families: Vec<&Family> = families.iter().collect();
    sorted_families.sort_by(|a, b| a.name.cmp(&b.name));

    let mut flat_list = Vec::new();
    for family in sorted_families {
        if !family.runs_on(year, month, day, weekday, &calendars)? {
            continue;
        }

        let mut job_names: Vec<&String> = family.jobs_by_name.keys().collect();
        job_names.sort();

        for job_name in job_names {
            let job = &family.jobs_by_name[job_name];

            if let Some(result) = world.get(&family.name, job_name) {
                flat_list.push(result.clone());
                continue;
            }

            let unmet = job.dependencies.iter().any(|d| !d.met(world, clock));
            let marker = markers.state(&family.name, job_name)?;
            let status = if marker.released {
                JobStatus::Released
            } else if marker.held {
                JobStatus::Hold
            } else if unmet {
                JobStatus::Waiting
            } else {
                JobStatus::Ready
            };

            flat_list.push(JobResult::projected(
                family.name.clone(),
                job_name.clone(),
                status,
                job.queue.clone(),
                family.effective_tz(&config.primary_tz).to_string(),
                job.tokens.clone(),
            ));
        }
    }

    let mut staged_token_doc = token_doc.to_vec();
    for result in &mut flat_list {
        if result.status != JobStatus::Ready || result.tokens.is_empty() {
            continue;
        }
        match consume_tokens_from_doc(
            config,
            &result.tokens,
            &staged_token_doc,
            &result.family_name,
            &result.job_name,
        ) {
            Some(new_doc) => staged_token_doc = new_doc,
            None => result.status = JobStatus::TokenWait,
        }
    }

    Ok(SchedulingResult { flat_list, staged_token_doc })
}
