//! Info file entity module
//!
//! The raw on-disk `*.info` TOML document (spec §3 "Info file"), distinct
//! from [`JobResult`](super::job_result::JobResult): this is what the
//! worker actually writes, before the scheduling engine infers a
//! `JobStatus` from it. An info file with `retry_wait_until` set and no
//! `error_code` means "awaiting retry at that epoch"; one with neither set
//! means "still running".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::JobStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InfoFile {
    pub family_name: String,
    pub job_name: String,
    pub queue_name: String,
    pub tz: String,
    pub num_retries: i32,
    pub retry_sleep: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_pid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_pid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_log_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_wait_until: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i32>,
    /// Holds `original_error_code_<timestamp>` keys written by `mark`
    /// (spec §4.8); any other dynamic key a future caller adds round-trips
    /// the same way.
    #[serde(flatten, default)]
    pub extra: BTreeMap<String, i32>,
    #[serde(default)]
    pub tokens: Vec<String>,
}

impl InfoFile {
    pub fn new(
        family_name: impl Into<String>,
        job_name: impl Into<String>,
        queue_name: impl Into<String>,
        tz: impl Into<String>,
        num_retries: i32,
        retry_sleep: i32,
        tokens: Vec<String>,
    ) -> Self {
        Self {
            family_name: family_name.into(),
            job_name: job_name.into(),
            queue_name: queue_name.into(),
            tz: tz.into(),
            num_retries,
            retry_sleep,
            worker_name: None,
            worker_pid: None,
            job_pid: None,
            start_time: None,
            job_log_file: None,
            retry_wait_until: None,
            error_code: None,
            extra: BTreeMap::new(),
            tokens,
        }
    }

    /// Overwrites `error_code`, preserving the prior value under a
    /// timestamped `original_error_code_<stamp>` key (spec §4.8 `mark`).
    /// `stamp` is caller-supplied (`YYYYMMDD_HHMMSS`) so this stays a pure
    /// function of its inputs.
    pub fn mark(&mut self, new_error_code: i32, stamp: &str) {
        if let Some(old) = self.error_code {
            self.extra.insert(format!("original_error_code_{stamp}"), old);
        }
        self.error_code = Some(new_error_code);
    }

    /// Infers the job's current status from this file's shape (spec §4.4
    /// step 1, §4.7).
    pub fn derive_status(&self) -> JobStatus {
        match self.error_code {
            Some(0) => JobStatus::Success,
            Some(_) => JobStatus::Failure,
            None if self.retry_wait_until.is_some() => JobStatus::RetryWait,
            None => JobStatus::Running,
        }
    }
}
