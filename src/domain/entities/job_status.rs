//! Job status entity module
//!
//! The per-job status enum, string forms used in persisted JSON/TOML match
//! spec §3 exactly (`"Token Wait"`, `"On Hold"`, `"Retry Wait"` are the only
//! multi-word variants).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Waiting,
    Ready,
    Released,
    #[serde(rename = "Token Wait")]
    TokenWait,
    Running,
    Success,
    Failure,
    #[serde(rename = "On Hold")]
    Hold,
    #[serde(rename = "Retry Wait")]
    RetryWait,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Waiting => "Waiting",
            JobStatus::Ready => "Ready",
            JobStatus::Released => "Released",
            JobStatus::TokenWait => "Token Wait",
            JobStatus::Running => "Running",
            JobStatus::Success => "Success",
            JobStatus::Failure => "Failure",
            JobStatus::Hold => "On Hold",
            JobStatus::RetryWait => "Retry Wait",
        }
    }

    /// A job in one of these statuses has already run to a terminal state
    /// today and will not be reconsidered by the scheduling engine.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Failure)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
