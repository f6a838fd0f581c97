//! Family repository trait
//!
//! Lists and parses family files from the dated family directory, applying
//! the config's `ignore_regex` and filename-sort order (spec §4.6 step 1).

use anyhow::Result;

use crate::domain::entities::Family;

pub trait FamilyRepository: Send + Sync {
    /// Ensures today's dated family directory exists, copying the source
    /// family files into it on the first call of the day, then parses
    /// every (non-ignored) file in filename-sort order.
    fn load_today(&self) -> Result<Vec<Family>>;
}
