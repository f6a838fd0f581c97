//! Job key value object module
//!
//! A `(family_name, job_name)` pair, used as the join key between the
//! parsed family graph and the on-disk world projection.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobKey {
    pub family_name: String,
    pub job_name: String,
}

impl JobKey {
    pub fn new(family_name: impl Into<String>, job_name: impl Into<String>) -> Self {
        Self {
            family_name: family_name.into(),
            job_name: job_name.into(),
        }
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.family_name, self.job_name)
    }
}
