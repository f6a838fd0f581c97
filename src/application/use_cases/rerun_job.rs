//! Rerun
//!
//! Operator action (spec §4.8 `rerun`): preserves the job's current info
//! file under a `-Orig-N` suffix (renaming in place, not copying — confirmed
//! against `rerun.py`, SPEC_FULL.md B) and releases the job so it becomes
//! `Released` on the next tick. A no-op if the job's current attempt is
//! still live (no `error_code` yet).

use anyhow::{anyhow, Result};

use crate::domain::entities::MarkerKind;
use crate::domain::errors::{messages, ParseError};
use crate::domain::repositories::{InfoFileRepository, MarkerRepository};

/// Returns `true` if a rerun was performed, `false` if the job has no
/// terminal attempt to preserve (still running).
pub fn rerun_job(
    info_repo: &dyn InfoFileRepository,
    markers: &dyn MarkerRepository,
    family_name: &str,
    job_name: &str,
) -> Result<bool> {
    let current = info_repo.find_current(family_name, job_name)?;
    let [name] = current.as_slice() else {
        return Err(anyhow!(ParseError::new(
            messages::CANT_FIND_SINGLE_INFO_FILE,
            format!("{family_name}.{job_name}")
        )));
    };

    let mut info = info_repo.read(name)?;
    if info.error_code.is_none() {
        return Ok(false);
    }

    let all = info_repo.find_all(family_name, job_name)?;
    let next_n = all.iter().filter_map(|n| n.orig_suffix()).max().unwrap_or(0) + 1;

    let renamed = name.with_orig_suffix(next_n);
    info_repo.rename(name, &renamed)?;
    info.job_name = format!("{job_name}-Orig-{next_n}");
    info_repo.write(&renamed, &info)?;

    markers.set(family_name, job_name, MarkerKind::Release)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::InfoFile;
    use crate::domain::value_objects::{FileKind, InfoFileName};
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::repositories::{FilesystemInfoFileRepository, FilesystemMarkerRepository};
    use tempfile::tempdir;

    #[test]
    fn rerun_renames_and_releases() {
        let log_dir = tempdir().unwrap();
        let clock = SystemClock::new();
        let info_repo = FilesystemInfoFileRepository::new(log_dir.path().to_str().unwrap(), "UTC", &clock);
        let markers = FilesystemMarkerRepository::new(log_dir.path().to_str().unwrap(), "UTC", &clock);

        let name = InfoFileName::new("F2", "JA", "default", "x", "20240214021500", FileKind::Info);
        let mut info = InfoFile::new("F2", "JA", "default", "UTC", 0, 1, vec![]);
        info.error_code = Some(0);
        info_repo.write(&name, &info).unwrap();

        let did_rerun = rerun_job(&info_repo, &markers, "F2", "JA").unwrap();
        assert!(did_rerun);

        assert!(info_repo.read(&name).is_err());
        let orig_name = name.with_orig_suffix(1);
        let preserved = info_repo.read(&orig_name).unwrap();
        assert_eq!(preserved.job_name, "JA-Orig-1");

        let state = markers.state("F2", "JA").unwrap();
        assert!(state.released);
    }

    #[test]
    fn rerun_is_a_noop_for_a_still_running_job() {
        let log_dir = tempdir().unwrap();
        let clock = SystemClock::new();
        let info_repo = FilesystemInfoFileRepository::new(log_dir.path().to_str().unwrap(), "UTC", &clock);
        let markers = FilesystemMarkerRepository::new(log_dir.path().to_str().unwrap(), "UTC", &clock);

        let name = InfoFileName::new("F2", "JA", "default", "x", "20240214021500", FileKind::Info);
        let info = InfoFile::new("F2", "JA", "default", "UTC", 0, 1, vec![]);
        info_repo.write(&name, &info).unwrap();

        let did_rerun = rerun_job(&info_repo, &markers, "F2", "JA").unwrap();
        assert!(!did_rerun);
        assert!(info_repo.read(&name).is_ok());
        let state = markers.state("F2", "JA").unwrap();
        assert!(!state.released);
    }

    #[test]
    fn second_rerun_picks_next_suffix() {
        let log_dir = tempdir().unwrap();
        let clock = SystemClock::new();
        let info_repo = FilesystemInfoFileRepository::new(log_dir.path().to_str().unwrap(), "UTC", &clock);
        let markers = FilesystemMarkerRepository::new(log_dir.path().to_str().unwrap(), "UTC", &clock);

        let name = InfoFileName::new("F2", "JA", "default", "x", "20240214021500", FileKind::Info);
        let mut info = InfoFile::new("F2", "JA", "default", "UTC", 0, 1, vec![]);
        info.error_code = Some(0);
        info_repo.write(&name, &info).unwrap();
        rerun_job(&info_repo, &markers, "F2", "JA").unwrap();

        let name2 = InfoFileName::new("F2", "JA", "default", "x", "20240214031500", FileKind::Info);
        let mut info2 = InfoFile::new("F2", "JA", "default", "UTC", 0, 1, vec![]);
        info2.error_code = Some(0);
        info_repo.write(&name2, &info2).unwrap();
        rerun_job(&info_repo, &markers, "F2", "JA").unwrap();

        let all = info_repo.find_all("F2", "JA").unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|n| n.orig_suffix() == Some(1)));
        assert!(all.iter().any(|n| n.orig_suffix() == Some(2)));
    }
}
