//! Filesystem-backed `FamilyRepository`
//!
//! Snapshots the source family directory into today's dated subdirectory on
//! the first call of the day, then parses every (non-ignored) file there in
//! filename-sort order (spec §4.6 step 1).

use std::path::Path;

use anyhow::Result;

use crate::domain::clock::{parse_tz, today, Clock};
use crate::domain::entities::Family;
use crate::domain::repositories::FamilyRepository;
use crate::infrastructure::config::Config;
use crate::infrastructure::dirs;
use crate::infrastructure::parsers::parse_all;

pub struct FilesystemFamilyRepository<'a> {
    config: &'a Config,
    clock: &'a dyn Clock,
}

impl<'a> FilesystemFamilyRepository<'a> {
    pub fn new(config: &'a Config, clock: &'a dyn Clock) -> Self {
        Self { config, clock }
    }

    fn todays_family_dir(&self) -> Result<std::path::PathBuf> {
        let tz = parse_tz(&self.config.primary_tz)
            .ok_or_else(|| anyhow::anyhow!("unknown primary_tz {}", self.config.primary_tz))?;
        let (y, m, d) = today(self.clock, tz);
        let source = Path::new(&self.config.family_dir);
        let dated = dirs::dated_subdir(source, y, m, d);
        if !dated.exists() {
            dirs::ensure_dir(&dated)?;
            dirs::copy_files(source, &dated)?;
        }
        Ok(dated)
    }
}

impl FamilyRepository for FilesystemFamilyRepository<'_> {
    fn load_today(&self) -> Result<Vec<Family>> {
        let dated = self.todays_family_dir()?;
        let ignore = dirs::compile_ignore_patterns(&self.config.ignore_regex)?;
        parse_all(&dated, &ignore, self.config).map_err(anyhow::Error::from)
    }
}
