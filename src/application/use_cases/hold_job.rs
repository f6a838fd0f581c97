//! Hold / release / remove-hold
//!
//! Operator actions (spec §4.8): writing a `.hold` or `.release` marker
//! always removes the opposite one; `remove_hold` clears only the hold
//! marker, leaving a coexisting release untouched. All three are
//! idempotent (spec §8).

use anyhow::Result;

use crate::domain::entities::MarkerKind;
use crate::domain::repositories::MarkerRepository;

pub fn hold_job(markers: &dyn MarkerRepository, family_name: &str, job_name: &str) -> Result<()> {
    markers.set(family_name, job_name, MarkerKind::Hold)
}

pub fn remove_hold(markers: &dyn MarkerRepository, family_name: &str, job_name: &str) -> Result<()> {
    markers.remove_hold(family_name, job_name)
}

pub fn release_dependencies(markers: &dyn MarkerRepository, family_name: &str, job_name: &str) -> Result<()> {
    markers.set(family_name, job_name, MarkerKind::Release)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::repositories::FilesystemMarkerRepository;
    use tempfile::tempdir;

    #[test]
    fn hold_then_release_clears_hold() {
        let log_dir = tempdir().unwrap();
        let clock = SystemClock::new();
        let markers = FilesystemMarkerRepository::new(log_dir.path().to_str().unwrap(), "UTC", &clock);
        hold_job(&markers, "F1", "J1").unwrap();
        release_dependencies(&markers, "F1", "J1").unwrap();
        let state = markers.state("F1", "J1").unwrap();
        assert!(state.released);
        assert!(!state.held);
    }

    #[test]
    fn remove_hold_is_idempotent_without_any_marker() {
        let log_dir = tempdir().unwrap();
        let clock = SystemClock::new();
        let markers = FilesystemMarkerRepository::new(log_dir.path().to_str().unwrap(), "UTC", &clock);
        remove_hold(&markers, "F1", "J1").unwrap();
        remove_hold(&markers, "F1", "J1").unwrap();
        let state = markers.state("F1", "J1").unwrap();
        assert!(!state.held && !state.released);
    }
}
