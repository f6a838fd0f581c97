//! Worker runner
//!
//! Spawns `job_dir/<job_name>` as a child process, streams its stdout/stderr
//! to a per-job log, and drives the info-file lifecycle through start,
//! retry-wait, and terminal states (spec §4.7). Grounded in the retry/backoff
//! shape of the teacher pack's own process-executor (`Gr8Gatsby-rae`'s
//! `scheduler::executor`), adapted to the synchronous, single-tick-owner
//! model this scheduler uses instead of an async job queue.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::domain::clock::Clock;
use crate::domain::entities::InfoFile;
use crate::domain::repositories::InfoFileRepository;
use crate::domain::value_objects::{FileKind, InfoFileName};
use crate::infrastructure::config::Config;
use crate::infrastructure::dirs;
use crate::infrastructure::output::JobLogSink;
use crate::infrastructure::worker::dispatcher::RunRequest;

/// The terminal outcome of one `run` call: the final `error_code` written to
/// the info file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub error_code: i32,
}

/// Runs one job locally, retrying up to `1 + request.num_retries` attempts
/// (spec §4.7). `worker_name` identifies this worker in the info/log
/// filenames; the in-process runner uses a fixed name since there's exactly
/// one of it per scheduler process.
pub fn run(
    config: &Config,
    clock: &dyn Clock,
    info_repo: &dyn InfoFileRepository,
    request: &RunRequest,
    worker_name: &str,
) -> Result<RunOutcome> {
    let tz = crate::domain::clock::parse_tz(&request.tz).unwrap_or(chrono_tz::UTC);
    let now = clock.now(tz);
    let timestamp = now.format("%Y%m%d%H%M%S").to_string();

    let info_name = InfoFileName::new(
        &request.family_name,
        &request.job_name,
        &request.queue_name,
        worker_name,
        timestamp.clone(),
        FileKind::Info,
    );
    let log_name = InfoFileName::new(
        &request.family_name,
        &request.job_name,
        &request.queue_name,
        worker_name,
        timestamp,
        FileKind::Log,
    );

    let dated_log_dir =
        dirs::todays_dated_dir(Path::new(&config.log_dir), clock, &config.primary_tz)?;
    let log_path = dated_log_dir.join(log_name.to_string());
    let sink = Arc::new(Mutex::new(JobLogSink::create(&log_path)?));

    let script_path = Path::new(&config.job_dir).join(&request.job_name);

    let mut attempt = 0i32;
    loop {
        attempt += 1;

        let mut child = Command::new(&script_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawning job script {}", script_path.display()))?;

        let mut info = InfoFile::new(
            &request.family_name,
            &request.job_name,
            &request.queue_name,
            &request.tz,
            request.num_retries,
            request.retry_sleep,
            request.tokens.clone(),
        );
        info.worker_name = Some(worker_name.to_string());
        info.worker_pid = Some(std::process::id());
        info.job_pid = child.id().into();
        info.start_time = Some(clock.now(tz).format("%Y/%m/%d %H:%M:%S").to_string());
        info.job_log_file = Some(log_path.to_string_lossy().into_owned());
        info_repo.write(&info_name, &info)?;

        let status = drain_to_sink(&mut child, &sink)?;
        let code = status.code().unwrap_or(-1);

        if code == 0 {
            info.error_code = Some(0);
            info_repo.write(&info_name, &info)?;
            return Ok(RunOutcome { error_code: 0 });
        }

        if attempt <= request.num_retries {
            info.job_pid = None;
            info.retry_wait_until = Some(clock.now(tz).timestamp() + request.retry_sleep as i64);
            info_repo.write(&info_name, &info)?;
            clock.sleep(Duration::from_secs(request.retry_sleep.max(0) as u64));
            continue;
        }

        info.error_code = Some(code);
        info_repo.write(&info_name, &info)?;
        return Ok(RunOutcome { error_code: code });
    }
}

/// Drains both pipes line-by-line to `sink` while the child runs, then waits
/// for it to exit (spec §4.7c: "poll the process... when poll() returns a
/// code, drain residuals"). Each pipe gets its own thread instead of manual
/// non-blocking polling; both are joined before the exit status is trusted.
fn drain_to_sink(child: &mut Child, sink: &Arc<Mutex<JobLogSink>>) -> Result<ExitStatus> {
    let stdout = child.stdout.take().context("job process missing stdout pipe")?;
    let stderr = child.stderr.take().context("job process missing stderr pipe")?;

    let out_sink = Arc::clone(sink);
    let out_handle = thread::spawn(move || {
        for line in BufReader::new(stdout).lines().map_while(Result::ok) {
            let _ = out_sink.lock().unwrap().info(&line);
        }
    });
    let err_sink = Arc::clone(sink);
    let err_handle = thread::spawn(move || {
        for line in BufReader::new(stderr).lines().map_while(Result::ok) {
            let _ = err_sink.lock().unwrap().error(&line);
        }
    });

    let status = child.wait().context("waiting for job process to exit")?;
    out_handle.join().ok();
    err_handle.join().ok();
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::repositories::FilesystemInfoFileRepository;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn write_script(job_dir: &Path, name: &str, body: &str) {
        let path = job_dir.join(name);
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn test_config(job_dir: &Path, log_dir: &Path) -> Config {
        Config {
            log_dir: log_dir.to_string_lossy().into_owned(),
            family_dir: "/tmp/fam".into(),
            job_dir: job_dir.to_string_lossy().into_owned(),
            instructions_dir: "/tmp/inst".into(),
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
    fn successful_job_writes_zero_error_code() {
        let job_dir = tempdir().unwrap();
        let log_dir = tempdir().unwrap();
        write_script(job_dir.path(), "J1", "#!/bin/sh\necho hello\nexit 0\n");

        let config = test_config(job_dir.path(), log_dir.path());
        let clock = SystemClock::new();
        let info_repo = FilesystemInfoFileRepository::new(&config.log_dir, &config.primary_tz, &clock);
        let request = RunRequest {
            family_name: "F1".into(),
            job_name: "J1".into(),
            tz: "UTC".into(),
            queue_name: "default".into(),
            num_retries: 0,
            retry_sleep: 1,
            tokens: vec![],
        };

        let outcome = run(&config, &clock, &info_repo, &request, "local").unwrap();
        assert_eq!(outcome.error_code, 0);

        let found = info_repo.find_current("F1", "J1").unwrap();
        assert_eq!(found.len(), 1);
        let info = info_repo.read(&found[0]).unwrap();
        assert_eq!(info.error_code, Some(0));
        assert!(info.job_log_file.is_some());
    }

    #[test]
    fn failing_job_with_no_retries_records_exit_code() {
        let job_dir = tempdir().unwrap();
        let log_dir = tempdir().unwrap();
        write_script(job_dir.path(), "J1", "#!/bin/sh\necho boom 1>&2\nexit 7\n");

        let config = test_config(job_dir.path(), log_dir.path());
        let clock = SystemClock::new();
        let info_repo = FilesystemInfoFileRepository::new(&config.log_dir, &config.primary_tz, &clock);
        let request = RunRequest {
            family_name: "F1".into(),
            job_name: "J1".into(),
            tz: "UTC".into(),
            queue_name: "default".into(),
            num_retries: 0,
            retry_sleep: 1,
            tokens: vec![],
        };

        let outcome = run(&config, &clock, &info_repo, &request, "local").unwrap();
        assert_eq!(outcome.error_code, 7);
    }

    #[test]
    fn failing_job_retries_before_recording_final_code() {
        let job_dir = tempdir().unwrap();
        let log_dir = tempdir().unwrap();
        write_script(job_dir.path(), "J1", "#!/bin/sh\nexit 3\n");

        let config = test_config(job_dir.path(), log_dir.path());
        let clock = SystemClock::new();
        let info_repo = FilesystemInfoFileRepository::new(&config.log_dir, &config.primary_tz, &clock);
        let request = RunRequest {
            family_name: "F1".into(),
            job_name: "J1".into(),
            tz: "UTC".into(),
            queue_name: "default".into(),
            num_retries: 1,
            retry_sleep: 0,
            tokens: vec![],
        };

        let outcome = run(&config, &clock, &info_repo, &request, "local").unwrap();
        assert_eq!(outcome.error_code, 3);
    }
}
