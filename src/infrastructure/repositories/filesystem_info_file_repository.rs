//! Filesystem-backed `InfoFileRepository`
//!
//! Reads and writes `*.info` TOML documents in today's dated log directory
//! (spec §3, §4.7, §4.8), via the atomic write-then-rename primitive in
//! `infrastructure::dirs`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::clock::Clock;
use crate::domain::entities::InfoFile;
use crate::domain::repositories::InfoFileRepository;
use crate::domain::value_objects::{FileKind, InfoFileName};
use crate::infrastructure::dirs;

pub struct FilesystemInfoFileRepository<'a> {
    log_dir: &'a str,
    primary_tz: &'a str,
    clock: &'a dyn Clock,
}

impl<'a> FilesystemInfoFileRepository<'a> {
    pub fn new(log_dir: &'a str, primary_tz: &'a str, clock: &'a dyn Clock) -> Self {
        Self { log_dir, primary_tz, clock }
    }

    fn dated_dir(&self) -> Result<PathBuf> {
        dirs::todays_dated_dir(std::path::Path::new(self.log_dir), self.clock, self.primary_tz)
    }

    fn path_for(&self, dated: &std::path::Path, name: &InfoFileName) -> PathBuf {
        dated.join(name.to_string())
    }

    fn list_matching(&self, family_name: &str, job_name: &str, current_only: bool) -> Result<Vec<InfoFileName>> {
        let dated = self.dated_dir()?;
        let ignore: Vec<regex::Regex> = Vec::new();
        let mut out = Vec::new();
        for path in dirs::list_files_ignoring(&dated, &ignore)? {
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else { continue };
            let Some(name) = InfoFileName::parse(filename) else { continue };
            if name.kind != FileKind::Info {
                continue;
            }
            if name.family_name != family_name || name.base_job_name() != job_name {
                continue;
            }
            if current_only && name.orig_suffix().is_some() {
                continue;
            }
            out.push(name);
        }
        out.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(out)
    }
}

impl InfoFileRepository for FilesystemInfoFileRepository<'_> {
    fn write(&self, name: &InfoFileName, info: &InfoFile) -> Result<()> {
        let dated = self.dated_dir()?;
        let path = self.path_for(&dated, name);
        let text = toml::to_string(info).context("serializing info file")?;
        dirs::atomic_write(&path, &text)
    }

    fn read(&self, name: &InfoFileName) -> Result<InfoFile> {
        let dated = self.dated_dir()?;
        let path = self.path_for(&dated, name);
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading info file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing info file {}", path.display()))
    }

    fn find_all(&self, family_name: &str, job_name: &str) -> Result<Vec<InfoFileName>> {
        self.list_matching(family_name, job_name, false)
    }

    fn find_current(&self, family_name: &str, job_name: &str) -> Result<Vec<InfoFileName>> {
        self.list_matching(family_name, job_name, true)
    }

    fn rename(&self, from: &InfoFileName, to: &InfoFileName) -> Result<()> {
        let dated = self.dated_dir()?;
        std::fs::rename(self.path_for(&dated, from), self.path_for(&dated, to))
            .with_context(|| format!("renaming {from} to {to}"))
    }
}
