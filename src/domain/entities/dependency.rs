//! Dependency entity module
//!
//! A fixed-variant sum type evaluated against the day's world projection
//! (spec §3, §4.3). Dependency sets are de-duplicated, so every variant
//! carries a stable string form used for `Hash`/`Eq`/`Ord`.

use std::fmt;

use chrono::{Datelike, TimeZone};
use chrono_tz::Tz;

use crate::domain::clock::Clock;
use crate::domain::world::World;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dependency {
    Time(TimeDependency),
    Job(JobDependency),
    External(ExternalDependency),
    Token,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeDependency {
    pub hh: u32,
    pub mm: u32,
    pub tz: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobDependency {
    pub family_name: String,
    pub job_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExternalDependency {
    pub family_name: String,
    pub job_name: String,
}

impl Dependency {
    pub fn time(hh: u32, mm: u32, tz: impl Into<String>) -> Self {
        Dependency::Time(TimeDependency { hh, mm, tz: tz.into() })
    }

    pub fn job(family_name: impl Into<String>, job_name: impl Into<String>) -> Self {
        Dependency::Job(JobDependency {
            family_name: family_name.into(),
            job_name: job_name.into(),
        })
    }

    pub fn external(family_name: impl Into<String>, job_name: impl Into<String>) -> Self {
        Dependency::External(ExternalDependency {
            family_name: family_name.into(),
            job_name: job_name.into(),
        })
    }

    /// Evaluates this dependency against the current tick's world
    /// projection. `clock` only matters for the `Time` variant.
    pub fn met(&self, world: &World, clock: &dyn Clock) -> bool {
        match self {
            Dependency::Time(t) => t.met(clock),
            Dependency::Job(j) => world.has_succeeded(&j.family_name, &j.job_name),
            Dependency::External(e) => world.has_succeeded(&e.family_name, &e.job_name),
            Dependency::Token => true,
        }
    }
}

impl TimeDependency {
    fn met(&self, clock: &dyn Clock) -> bool {
        let tz: Tz = self.tz.parse().unwrap_or(chrono_tz::UTC);
        let now = clock.now(tz);
        let Some(then) = tz
            .with_ymd_and_hms(now.year(), now.month(), now.day(), self.hh, self.mm, 0)
            .single()
        else {
            return false;
        };
        then <= now
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::Time(t) => write!(f, "Time({:02}:{:02} {})", t.hh, t.mm, t.tz),
            Dependency::Job(j) => write!(f, "Job({}::{})", j.family_name, j.job_name),
            Dependency::External(e) => write!(f, "External({}::{})", e.family_name, e.job_name),
            Dependency::Token => write!(f, "Token"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{JobResult, JobStatus};
    use std::time::Duration;

    struct FixedClock(chrono::DateTime<Tz>);

    impl Clock for FixedClock {
        fn now(&self, tz: Tz) -> chrono::DateTime<Tz> {
            self.0.with_timezone(&tz)
        }
        fn sleep(&self, _duration: Duration) {}
    }

    #[test]
    fn time_dependency_is_met_once_clock_passes_threshold() {
        let tz = chrono_tz::UTC;
        let before = FixedClock(tz.with_ymd_and_hms(2024, 2, 14, 2, 0, 0).unwrap());
        let after = FixedClock(tz.with_ymd_and_hms(2024, 2, 14, 2, 15, 0).unwrap());
        let dep = Dependency::time(2, 15, "UTC");
        let world = World::new();
        assert!(!dep.met(&world, &before));
        assert!(dep.met(&world, &after));
    }

    #[test]
    fn job_dependency_needs_successful_projection() {
        let mut world = World::new();
        let tz = chrono_tz::UTC;
        let clock = FixedClock(tz.with_ymd_and_hms(2024, 2, 14, 2, 0, 0).unwrap());
        let dep = Dependency::job("F1", "JA");
        assert!(!dep.met(&world, &clock));

        let mut r = JobResult::projected("F1", "JA", JobStatus::Success, "default", "UTC", vec![]);
        r.error_code = Some(0);
        world.insert(r);
        assert!(dep.met(&world, &clock));
    }

    #[test]
    fn external_dependency_ignores_nonzero_error_code() {
        let mut world = World::new();
        let tz = chrono_tz::UTC;
        let clock = FixedClock(tz.with_ymd_and_hms(2024, 2, 14, 2, 0, 0).unwrap());
        let mut r = JobResult::projected("F2", "JA", JobStatus::Failure, "default", "UTC", vec![]);
        r.error_code = Some(1);
        world.insert(r);
        let dep = Dependency::external("F2", "JA");
        assert!(!dep.met(&world, &clock));
    }

    #[test]
    fn stable_string_form_is_used_for_dedup() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Dependency::job("F1", "JA"));
        set.insert(Dependency::job("F1", "JA"));
        assert_eq!(set.len(), 1);
    }
}
