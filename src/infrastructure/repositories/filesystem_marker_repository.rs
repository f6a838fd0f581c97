//! Filesystem-backed `MarkerRepository`
//!
//! `.hold` / `.release` marker files live in today's dated log directory,
//! not the family directory (spec.md §3; confirmed against
//! `holdAndRelease.py` in the original source). Writing one kind always
//! deletes the other.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::clock::Clock;
use crate::domain::entities::{MarkerKind, MarkerState};
use crate::domain::repositories::MarkerRepository;
use crate::infrastructure::dirs;

pub struct FilesystemMarkerRepository<'a> {
    log_dir: &'a str,
    primary_tz: &'a str,
    clock: &'a dyn Clock,
}

impl<'a> FilesystemMarkerRepository<'a> {
    pub fn new(log_dir: &'a str, primary_tz: &'a str, clock: &'a dyn Clock) -> Self {
        Self { log_dir, primary_tz, clock }
    }

    fn dated_dir(&self) -> Result<PathBuf> {
        dirs::todays_dated_dir(std::path::Path::new(self.log_dir), self.clock, self.primary_tz)
    }

    fn marker_path(dated: &std::path::Path, family_name: &str, job_name: &str, kind: MarkerKind) -> PathBuf {
        dated.join(format!("{family_name}.{job_name}.{}", kind.extension()))
    }
}

impl MarkerRepository for FilesystemMarkerRepository<'_> {
    fn state(&self, family_name: &str, job_name: &str) -> Result<MarkerState> {
        let dated = self.dated_dir()?;
        Ok(MarkerState {
            held: Self::marker_path(&dated, family_name, job_name, MarkerKind::Hold).exists(),
            released: Self::marker_path(&dated, family_name, job_name, MarkerKind::Release).exists(),
        })
    }

    fn set(&self, family_name: &str, job_name: &str, kind: MarkerKind) -> Result<()> {
        let dated = self.dated_dir()?;
        let primary = Self::marker_path(&dated, family_name, job_name, kind);
        std::fs::write(&primary, "")
            .with_context(|| format!("writing marker {}", primary.display()))?;
        let opposite = Self::marker_path(&dated, family_name, job_name, kind.opposite());
        if opposite.exists() {
            std::fs::remove_file(&opposite)
                .with_context(|| format!("removing marker {}", opposite.display()))?;
        }
        Ok(())
    }

    fn remove_hold(&self, family_name: &str, job_name: &str) -> Result<()> {
        let dated = self.dated_dir()?;
        let hold = Self::marker_path(&dated, family_name, job_name, MarkerKind::Hold);
        if hold.exists() {
            std::fs::remove_file(&hold)
                .with_context(|| format!("removing marker {}", hold.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemClock;
    use tempfile::tempdir;

    #[test]
    fn setting_hold_clears_prior_release() {
        let log_dir = tempdir().unwrap();
        let clock = SystemClock::new();
        let repo = FilesystemMarkerRepository::new(log_dir.path().to_str().unwrap(), "UTC", &clock);
        repo.set("F1", "J1", MarkerKind::Release).unwrap();
        repo.set("F1", "J1", MarkerKind::Hold).unwrap();
        let state = repo.state("F1", "J1").unwrap();
        assert!(state.held);
        assert!(!state.released);
    }

    #[test]
    fn repeated_hold_is_idempotent() {
        let log_dir = tempdir().unwrap();
        let clock = SystemClock::new();
        let repo = FilesystemMarkerRepository::new(log_dir.path().to_str().unwrap(), "UTC", &clock);
        repo.set("F1", "J1", MarkerKind::Hold).unwrap();
        repo.set("F1", "J1", MarkerKind::Hold).unwrap();
        let state = repo.state("F1", "J1").unwrap();
        assert!(state.held);
    }

    #[test]
    fn remove_hold_leaves_release_untouched() {
        let log_dir = tempdir().unwrap();
        let clock = SystemClock::new();
        let repo = FilesystemMarkerRepository::new(log_dir.path().to_str().unwrap(), "UTC", &clock);
        repo.set("F1", "J1", MarkerKind::Hold).unwrap();
        repo.remove_hold("F1", "J1").unwrap();
        let state = repo.state("F1", "J1").unwrap();
        assert!(!state.held);
        assert!(!state.released);
    }

    #[test]
    fn neither_marker_is_the_default() {
        let log_dir = tempdir().unwrap();
        let clock = SystemClock::new();
        let repo = FilesystemMarkerRepository::new(log_dir.path().to_str().unwrap(), "UTC", &clock);
        let state = repo.state("F1", "J1").unwrap();
        assert!(!state.held && !state.released);
    }
}
