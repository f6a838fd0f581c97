//! Job entity module
//!
//! A single unit of work inside a family (spec §3). Dependencies are
//! compiled by the parser (spec §4.2) and stored here as a plain set.

use std::collections::BTreeSet;

use crate::domain::entities::Dependency;
use crate::domain::value_objects::TimeOfDay;

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub job_name: String,
    pub family_name: String,
    pub queue: String,
    pub tz: Option<String>,
    pub start_time: Option<TimeOfDay>,
    pub until_time: Option<TimeOfDay>,
    pub every_seconds: Option<u32>,
    pub chained: bool,
    pub tokens: Vec<String>,
    pub num_retries: i32,
    pub retry_sleep_min: i32,
    pub email: Option<String>,
    pub retry_email: Option<String>,
    pub retry_success_email: Option<String>,
    pub no_retry_email: bool,
    pub no_retry_success_email: bool,
    pub comment: Option<String>,
    pub dependencies: BTreeSet<Dependency>,
}

impl Job {
    pub fn new(job_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            family_name: family_name.into(),
            queue: "default".to_string(),
            tz: None,
            start_time: None,
            until_time: None,
            every_seconds: None,
            chained: false,
            tokens: Vec::new(),
            num_retries: 0,
            retry_sleep_min: 1,
            email: None,
            retry_email: None,
            retry_success_email: None,
            no_retry_email: false,
            no_retry_success_email: false,
            comment: None,
            dependencies: BTreeSet::new(),
        }
    }

    pub fn is_repeating(&self) -> bool {
        self.every_seconds.is_some()
    }

    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    pub fn has_tokens(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Expands a repeating job into one child per slot from `start_time` to
    /// `until_time` (falling back to `default_until`), spaced by
    /// `every_seconds`, each named `<job>-HHMM` (spec §4.2).
    pub fn expand_repeating(&self, default_until: TimeOfDay) -> Vec<Job> {
        let Some(every) = self.every_seconds else {
            return vec![self.clone()];
        };
        let start = self.start_time.unwrap_or(TimeOfDay::new(0, 0));
        let until = self.until_time.unwrap_or(default_until);

        let mut slots = Vec::new();
        let mut minutes = start.hour * 60 + start.minute;
        let until_minutes = until.hour * 60 + until.minute;
        let step_minutes = (every / 60).max(1);

        while minutes <= until_minutes {
            let hour = minutes / 60;
            let minute = minutes % 60;
            let slot_time = TimeOfDay::new(hour, minute);
            let mut child = self.clone();
            child.job_name = format!("{}-{:02}{:02}", self.job_name, hour, minute);
            child.start_time = Some(slot_time);
            child.every_seconds = None;
            slots.push(child);
            minutes += step_minutes;
        }
        slots
    }
}
