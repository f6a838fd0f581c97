//! Info file repository trait
//!
//! Read/write access to `*.info` files in today's log directory (spec §3,
//! §4.7, §4.8). Implementations own the atomic write-then-rename discipline
//! required by the concurrency model.

use anyhow::Result;

use crate::domain::entities::InfoFile;
use crate::domain::value_objects::InfoFileName;

pub trait InfoFileRepository: Send + Sync {
    /// Writes or overwrites the info file named by `name`.
    fn write(&self, name: &InfoFileName, info: &InfoFile) -> Result<()>;

    fn read(&self, name: &InfoFileName) -> Result<InfoFile>;

    /// Finds every info file (current and `-Orig-N`) belonging to
    /// `(family, job)` in today's log directory.
    fn find_all(&self, family_name: &str, job_name: &str) -> Result<Vec<InfoFileName>>;

    /// Finds the single current (non `-Orig-N`) info file for
    /// `(family, job)`. Zero or more-than-one matches is the caller's
    /// `CANT_FIND_SINGLE_INFO_FILE` error to raise.
    fn find_current(&self, family_name: &str, job_name: &str) -> Result<Vec<InfoFileName>>;

    /// Renames the file named `from` to `to` (used by `rerun`).
    fn rename(&self, from: &InfoFileName, to: &InfoFileName) -> Result<()>;
}
