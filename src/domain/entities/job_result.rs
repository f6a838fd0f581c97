//! Job result entity module
//!
//! The projection record read from and written to `*.info` files (spec §3).
//! One `JobResult` exists per `(family, job)` attempt started today; the
//! scheduler's world projection is a `family -> job -> JobResult` map built
//! by scanning today's log directory once per tick.

use serde::{Deserialize, Serialize};

use super::{InfoFile, JobStatus};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobResult {
    pub family_name: String,
    pub job_name: String,
    pub status: JobStatus,
    pub queue_name: String,
    pub tz: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i32>,
    pub tokens: Vec<String>,
    pub num_retries: i32,
    pub retry_sleep: i32,
}

impl JobResult {
    /// Builds the result for a job that hasn't run yet today — the shape
    /// produced by the scheduling engine's live-dependency pass, before any
    /// info file exists.
    pub fn projected(
        family_name: impl Into<String>,
        job_name: impl Into<String>,
        status: JobStatus,
        queue_name: impl Into<String>,
        tz: impl Into<String>,
        tokens: Vec<String>,
    ) -> Self {
        Self {
            family_name: family_name.into(),
            job_name: job_name.into(),
            status,
            queue_name: queue_name.into(),
            tz: tz.into(),
            worker_name: None,
            start_time: None,
            error_code: None,
            tokens,
            num_retries: 0,
            retry_sleep: 1,
        }
    }

    /// Projects the on-disk `InfoFile` into the status record the
    /// scheduling engine and status JSON output deal with.
    pub fn from_info_file(info: &InfoFile) -> Self {
        Self {
            family_name: info.family_name.clone(),
            job_name: info.job_name.clone(),
            status: info.derive_status(),
            queue_name: info.queue_name.clone(),
            tz: info.tz.clone(),
            worker_name: info.worker_name.clone(),
            start_time: info.start_time.clone(),
            error_code: info.error_code,
            tokens: info.tokens.clone(),
            num_retries: info.num_retries,
            retry_sleep: info.retry_sleep,
        }
    }

    /// A job is an "active holder" of its tokens when it has started but
    /// has no terminal error code yet (spec §8 token invariant).
    pub fn is_active(&self) -> bool {
        self.error_code.is_none()
    }

    pub fn succeeded(&self) -> bool {
        self.error_code == Some(0)
    }
}
