//! Mark
//!
//! Operator action (spec §4.8 `mark`): overwrites a job's `error_code`,
//! preserving the prior value under a timestamped `original_error_code_*`
//! key so the history survives.

use anyhow::{anyhow, Result};

use crate::domain::clock::Clock;
use crate::domain::errors::{messages, ParseError};
use crate::domain::repositories::InfoFileRepository;

/// Finds the single current info file for `(family, job)`, sets its
/// `error_code` to `new_error_code`, and rewrites it. `CANT_FIND_SINGLE_INFO_FILE`
/// if zero or more than one current file matches.
pub fn mark_job(
    info_repo: &dyn InfoFileRepository,
    clock: &dyn Clock,
    family_name: &str,
    job_name: &str,
    new_error_code: i32,
) -> Result<()> {
    let matches = info_repo.find_current(family_name, job_name)?;
    let [name] = matches.as_slice() else {
        return Err(anyhow!(ParseError::new(
            messages::CANT_FIND_SINGLE_INFO_FILE,
            format!("{family_name}.{job_name}")
        )));
    };

    let mut info = info_repo.read(name)?;
    let stamp = clock.now(chrono_tz::UTC).format("%Y%m%d_%H%M%S").to_string();
    info.mark(new_error_code, &stamp);
    info_repo.write(name, &info)
}
