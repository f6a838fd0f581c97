//! Marker repository trait
//!
//! `.hold` / `.release` marker files, scoped to today's log directory
//! (spec §3, §4.8).

use anyhow::Result;

use crate::domain::entities::MarkerKind;

pub trait MarkerRepository: Send + Sync {
    fn state(&self, family_name: &str, job_name: &str) -> Result<crate::domain::entities::MarkerState>;

    /// Writes the given marker, deleting the opposite one if present.
    /// Idempotent: writing the same marker twice is a no-op on the second
    /// call.
    fn set(&self, family_name: &str, job_name: &str, kind: MarkerKind) -> Result<()>;

    /// Removes only the `.hold` marker, leaving any `.release` marker
    /// untouched. Distinct from `set(.., Release)`, which also asserts a
    /// release (spec §4.8 `remove_hold`). Idempotent: a no-op if no `.hold`
    /// marker exists.
    fn remove_hold(&self, family_name: &str, job_name: &str) -> Result<()>;
}
