//! Worker transport boundary
//!
//! Spec.md §1 lists the worker transport — a message broker delivering
//! dispatch records to workers — as out of scope, referenced only by its
//! interface: `enqueue(job run-record, queue name)`. `QueueClient` is that
//! interface; `LoggingQueueClient` is a genuine stand-in, not a
//! reimplementation of the broker itself (SPEC_FULL.md A.6).

use anyhow::Result;
use tracing::info;

/// Everything a worker (local or remote) needs to run one job attempt.
/// Shared by the `run_local` in-process path and the `QueueClient` path so
/// both dispatch the same shape of record (spec §4.6 step 5).
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub family_name: String,
    pub job_name: String,
    pub tz: String,
    pub queue_name: String,
    pub num_retries: i32,
    pub retry_sleep: i32,
    pub tokens: Vec<String>,
}

pub trait QueueClient: Send + Sync {
    /// Hands the run-record off to the named queue. Implementations for a
    /// real broker (Celery/RabbitMQ in the teacher's Python sibling) live
    /// outside this crate; it only defines the seam.
    fn enqueue(&self, request: &RunRequest, queue_name: &str) -> Result<()>;
}

/// Default `QueueClient`: records the dispatch via `tracing` instead of
/// delivering it anywhere. Lets `run_local = false` configurations exercise
/// the full scheduling/dispatch path without a broker present.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingQueueClient;

impl QueueClient for LoggingQueueClient {
    fn enqueue(&self, request: &RunRequest, queue_name: &str) -> Result<()> {
        info!(
            family = %request.family_name,
            job = %request.job_name,
            queue = %queue_name,
            "enqueued job run-record"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_queue_client_never_fails() {
        let client = LoggingQueueClient;
        let request = RunRequest {
            family_name: "F1".into(),
            job_name: "J1".into(),
            tz: "UTC".into(),
            queue_name: "default".into(),
            num_retries: 0,
            retry_sleep: 1,
            tokens: vec![],
        };
        assert!(client.enqueue(&request, "default").is_ok());
    }
}
