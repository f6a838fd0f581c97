//! Run tick
//!
//! One iteration of the main loop's body (spec §4.6, steps 1-5): parse
//! today's families, run the scheduling engine, commit the staged token
//! document, and dispatch every `Ready`/`Released` job. Returns the flat
//! status list so callers (the loop, `status`) can report it.

use anyhow::Result;

use crate::application::services::run_scheduling_pass;
use crate::domain::clock::Clock;
use crate::domain::entities::{Family, JobResult, JobStatus};
use crate::domain::repositories::{
    FamilyRepository, InfoFileRepository, MarkerRepository, TokenDocumentRepository,
    WorldRepository,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::worker::{shell_runner, QueueClient, RunRequest};

pub struct TickOutcome {
    pub flat_list: Vec<JobResult>,
    pub dispatched: usize,
}

#[allow(clippy::too_many_arguments)]
pub fn run_tick(
    config: &Config,
    clock: &dyn Clock,
    family_repo: &dyn FamilyRepository,
    world_repo: &dyn WorldRepository,
    marker_repo: &dyn MarkerRepository,
    token_repo: &dyn TokenDocumentRepository,
    info_repo: &dyn InfoFileRepository,
    queue_client: &dyn QueueClient,
) -> Result<TickOutcome> {
    let families = family_repo.load_today()?;
    let world = world_repo.load_today()?;
    let token_doc = token_repo.load()?;

    let scheduling = run_scheduling_pass(config, clock, &families, &world, marker_repo, &token_doc)?;

    let selected: Vec<&JobResult> = scheduling
        .flat_list
        .iter()
        .filter(|r| matches!(r.status, JobStatus::Ready | JobStatus::Released))
        .collect();

    if selected.is_empty() {
        return Ok(TickOutcome { flat_list: scheduling.flat_list, dispatched: 0 });
    }

    token_repo.save(Some(&scheduling.staged_token_doc))?;

    for result in &selected {
        let job = find_job(&families, &result.family_name, &result.job_name);
        let (num_retries, retry_sleep) = job
            .map(|j| (j.num_retries, j.retry_sleep_min))
            .unwrap_or((config.num_retries, config.retry_sleep));

        let request = RunRequest {
            family_name: result.family_name.clone(),
            job_name: result.job_name.clone(),
            tz: result.tz.clone(),
            queue_name: result.queue_name.clone(),
            num_retries,
            retry_sleep,
            tokens: result.tokens.clone(),
        };

        if config.run_local {
            shell_runner::run(config, clock, info_repo, &request, "local")?;
        } else {
            queue_client.enqueue(&request, &request.queue_name)?;
        }
    }

    Ok(TickOutcome { flat_list: scheduling.flat_list, dispatched: selected.len() })
}

fn find_job<'a>(families: &'a [Family], family_name: &str, job_name: &str) -> Option<&'a crate::domain::entities::Job> {
    families.iter().find(|f| f.name == family_name)?.job(job_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CalendarOrDays, Days, Job};
    use crate::domain::value_objects::TimeOfDay;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::repositories::{
        FilesystemFamilyRepository, FilesystemInfoFileRepository, FilesystemMarkerRepository,
        FilesystemTokenDocumentRepository, FilesystemWorldRepository,
    };
    use crate::infrastructure::worker::LoggingQueueClient;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn test_config(root: &std::path::Path) -> Config {
        Config {
            log_dir: root.join("log").to_string_lossy().into_owned(),
            family_dir: root.join("fam").to_string_lossy().into_owned(),
            job_dir: root.join("job").to_string_lossy().into_owned(),
            instructions_dir: root.join("inst").to_string_lossy().into_owned(),
            primary_tz: "UTC".into(),
            end_time_hr: 23,
            end_time_min: 55,
            once_only: true,
            run_local: true,
            num_retries: 0,
            retry_sleep: 1,
            ignore_regex: vec![],
            calendars: Default::default(),
            tokens: Default::default(),
        }
    }

    #[test]
    fn dispatches_ready_job_and_writes_success_info_file() {
        let root = tempdir().unwrap();
        let config = test_config(root.path());
        fs::create_dir_all(&config.family_dir).unwrap();
        fs::create_dir_all(&config.job_dir).unwrap();
        fs::write(std::path::Path::new(&config.family_dir).join("F1"), "start = \"0000\"\nJ1()\n").unwrap();
        let script = std::path::Path::new(&config.job_dir).join("J1");
        fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let clock = SystemClock::new();
        let family_repo = FilesystemFamilyRepository::new(&config, &clock);
        let world_repo = FilesystemWorldRepository::new(&config.log_dir, &config.primary_tz, &clock);
        let marker_repo = FilesystemMarkerRepository::new(&config.log_dir, &config.primary_tz, &clock);
        let token_repo = FilesystemTokenDocumentRepository::new(&config.log_dir);
        let info_repo = FilesystemInfoFileRepository::new(&config.log_dir, &config.primary_tz, &clock);
        let queue_client = LoggingQueueClient;

        let outcome = run_tick(
            &config,
            &clock,
            &family_repo,
            &world_repo,
            &marker_repo,
            &token_repo,
            &info_repo,
            &queue_client,
        )
        .unwrap();

        assert_eq!(outcome.dispatched, 1);
        let found = info_repo.find_current("F1", "J1").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(info_repo.read(&found[0]).unwrap().error_code, Some(0));
    }

    #[test]
    fn tick_with_nothing_ready_does_not_touch_token_document() {
        let root = tempdir().unwrap();
        let config = test_config(root.path());
        fs::create_dir_all(&config.family_dir).unwrap();
        fs::create_dir_all(&config.job_dir).unwrap();
        fs::write(
            std::path::Path::new(&config.family_dir).join("F1"),
            "start = \"0000\"\nJ1(start=\"2359\")\n",
        )
        .unwrap();

        let clock = SystemClock::new();
        let family_repo = FilesystemFamilyRepository::new(&config, &clock);
        let world_repo = FilesystemWorldRepository::new(&config.log_dir, &config.primary_tz, &clock);
        let marker_repo = FilesystemMarkerRepository::new(&config.log_dir, &config.primary_tz, &clock);
        let token_repo = FilesystemTokenDocumentRepository::new(&config.log_dir);
        let info_repo = FilesystemInfoFileRepository::new(&config.log_dir, &config.primary_tz, &clock);
        let queue_client = LoggingQueueClient;

        let outcome = run_tick(
            &config,
            &clock,
            &family_repo,
            &world_repo,
            &marker_repo,
            &token_repo,
            &info_repo,
            &queue_client,
        )
        .unwrap();

        assert_eq!(outcome.dispatched, 0);
        assert_eq!(outcome.flat_list[0].status, JobStatus::Waiting);
    }
}
