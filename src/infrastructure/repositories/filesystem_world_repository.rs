//! Filesystem-backed `WorldRepository`
//!
//! Scans today's dated log directory once per tick, parsing every current
//! (non `-Orig-N`) `*.info` file into the `family -> job -> JobResult`
//! projection the scheduling engine joins against (spec §4.3).

use anyhow::{Context, Result};

use crate::domain::clock::Clock;
use crate::domain::entities::JobResult;
use crate::domain::repositories::WorldRepository;
use crate::domain::value_objects::{FileKind, InfoFileName};
use crate::domain::world::World;
use crate::infrastructure::dirs;

pub struct FilesystemWorldRepository<'a> {
    log_dir: &'a str,
    primary_tz: &'a str,
    clock: &'a dyn Clock,
}

impl<'a> FilesystemWorldRepository<'a> {
    pub fn new(log_dir: &'a str, primary_tz: &'a str, clock: &'a dyn Clock) -> Self {
        Self { log_dir, primary_tz, clock }
    }
}

impl WorldRepository for FilesystemWorldRepository<'_> {
    fn load_today(&self) -> Result<World> {
        let tz = crate::domain::clock::parse_tz(self.primary_tz)
            .ok_or_else(|| anyhow::anyhow!("unknown primary_tz {}", self.primary_tz))?;
        let (y, m, d) = crate::domain::clock::today(self.clock, tz);
        let dated = dirs::dated_subdir(std::path::Path::new(self.log_dir), y, m, d);

        let mut world = World::new();
        if !dated.exists() {
            return Ok(world);
        }

        let ignore: Vec<regex::Regex> = Vec::new();
        // Pick the latest-timestamped file per (family, job), tolerating a
        // rare partial write by simply preferring the newest complete scan
        // (spec §5: "readers tolerate the rare partial-read by retrying the
        // scan on the next tick").
        let mut latest: std::collections::HashMap<(String, String), (String, std::path::PathBuf)> =
            std::collections::HashMap::new();

        for path in dirs::list_files_ignoring(&dated, &ignore)? {
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else { continue };
            let Some(name) = InfoFileName::parse(filename) else { continue };
            if name.kind != FileKind::Info || name.orig_suffix().is_some() {
                continue;
            }
            let key = (name.family_name.clone(), name.job_name.clone());
            match latest.get(&key) {
                Some((ts, _)) if ts >= &name.timestamp => {}
                _ => {
                    latest.insert(key, (name.timestamp.clone(), path));
                }
            }
        }

        for (_, path) in latest.into_values() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading info file {}", path.display()))?;
            let info: crate::domain::entities::InfoFile = match toml::from_str(&text) {
                Ok(info) => info,
                // A worker may be mid-write; skip and pick it up next tick.
                Err(_) => continue,
            };
            let result = JobResult::from_info_file(&info);
            world.insert(result);
        }

        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::InfoFile;
    use crate::domain::value_objects::FileKind;
    use crate::infrastructure::clock::SystemClock;
    use tempfile::tempdir;

    #[test]
    fn missing_dated_dir_yields_empty_world() {
        let log_dir = tempdir().unwrap();
        let clock = SystemClock::new();
        let repo = FilesystemWorldRepository::new(log_dir.path().to_str().unwrap(), "UTC", &clock);
        let world = repo.load_today().unwrap();
        assert!(!world.has_succeeded("F1", "J1"));
    }

    #[test]
    fn reads_current_info_files_but_skips_orig_suffixed() {
        let log_dir = tempdir().unwrap();
        let clock = SystemClock::new();
        let (y, m, d) = crate::domain::clock::today(&clock, chrono_tz::UTC);
        let dated = dirs::dated_subdir(log_dir.path(), y, m, d);
        dirs::ensure_dir(&dated).unwrap();

        let current = InfoFileName::new("F1", "J1", "default", "x", "20240214021500", FileKind::Info);
        let orig = current.with_orig_suffix(1);
        let mut info = InfoFile::new("F1", "J1", "default", "UTC", 0, 1, vec![]);
        info.error_code = Some(0);
        std::fs::write(dated.join(current.to_string()), toml::to_string(&info).unwrap()).unwrap();
        std::fs::write(dated.join(orig.to_string()), toml::to_string(&info).unwrap()).unwrap();

        let repo = FilesystemWorldRepository::new(log_dir.path().to_str().unwrap(), "UTC", &clock);
        let world = repo.load_today().unwrap();
        assert!(world.has_succeeded("F1", "J1"));
        assert!(!world.has_succeeded("F1", "J1-Orig-1"));
    }
}
