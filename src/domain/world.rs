//! World projection module
//!
//! `World` is the two-level `family -> job -> JobResult` mapping built by
//! scanning today's log directory once per tick (spec §4.3). It is the
//! "observed state" half of the scheduling engine's join; the other half is
//! the in-memory `Family` graph parsed from family files.

use std::collections::HashMap;

use super::entities::JobResult;

#[derive(Debug, Clone, Default)]
pub struct World {
    families: HashMap<String, HashMap<String, JobResult>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, result: JobResult) {
        self.families
            .entry(result.family_name.clone())
            .or_default()
            .insert(result.job_name.clone(), result);
    }

    pub fn get(&self, family_name: &str, job_name: &str) -> Option<&JobResult> {
        self.families.get(family_name)?.get(job_name)
    }

    /// Satisfied iff the projection reports a terminal success for today
    /// (spec §3 `JobDependency`/`ExternalDependency` semantics).
    pub fn has_succeeded(&self, family_name: &str, job_name: &str) -> bool {
        self.get(family_name, job_name)
            .map(JobResult::succeeded)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::JobStatus;

    #[test]
    fn unknown_job_has_not_succeeded() {
        let world = World::new();
        assert!(!world.has_succeeded("F1", "J1"));
    }

    #[test]
    fn success_with_zero_error_code_counts() {
        let mut world = World::new();
        let mut r = JobResult::projected("F1", "J1", JobStatus::Success, "default", "UTC", vec![]);
        r.error_code = Some(0);
        world.insert(r);
        assert!(world.has_succeeded("F1", "J1"));
    }

    #[test]
    fn nonzero_error_code_is_not_success() {
        let mut world = World::new();
        let mut r = JobResult::projected("F1", "J1", JobStatus::Failure, "default", "UTC", vec![]);
        r.error_code = Some(1);
        world.insert(r);
        assert!(!world.has_succeeded("F1", "J1"));
    }
}
