//! Filesystem layer
//!
//! Dated subdirectory naming, ignore-regex filtered directory listing, and
//! atomic file writes — the primitives every repository implementation
//! builds on (spec §2 "Filesystem layer", §5 concurrency model).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;

use crate::domain::clock::{parse_tz, today, Clock};

/// `<base>/YYYYMMDD`, one per calendar day.
pub fn dated_subdir(base: &Path, year: i32, month: u32, day: u32) -> PathBuf {
    base.join(format!("{year:04}{month:02}{day:02}"))
}

/// `<base>/YYYYMMDD` for "today" in `tz_name`, created if necessary. Shared
/// by every repository that reads/writes under the dated log directory
/// (info files, markers).
pub fn todays_dated_dir(base: &Path, clock: &dyn Clock, tz_name: &str) -> Result<PathBuf> {
    let tz = parse_tz(tz_name).ok_or_else(|| anyhow::anyhow!("unknown timezone {tz_name}"))?;
    let (y, m, d) = today(clock, tz);
    let dated = dated_subdir(base, y, m, d);
    ensure_dir(&dated)?;
    Ok(dated)
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("creating directory {}", path.display()))?;
    Ok(())
}

/// Copies every regular file (not subdirectory) from `src` into `dest`.
/// Used once per day to snapshot family files into the dated family dir
/// before the scheduler reads them (spec §4.6).
pub fn copy_files(src: &Path, dest: &Path) -> Result<()> {
    for entry in fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            let target = dest.join(entry.file_name());
            fs::copy(entry.path(), &target)
                .with_context(|| format!("copying {} to {}", entry.path().display(), target.display()))?;
        }
    }
    Ok(())
}

/// Compiles the config's `ignore_regex` list once per caller.
pub fn compile_ignore_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).with_context(|| format!("compiling ignore regex {p}")))
        .collect()
}

/// Lists regular files in `dir` in filename-sort order, skipping any whose
/// name matches one of `ignore`. A missing directory yields an empty list
/// rather than an error.
pub fn list_files_ignoring(dir: &Path, ignore: &[Regex]) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if ignore.iter().any(|re| re.is_match(&name)) {
            continue;
        }
        names.push(entry.path());
    }
    names.sort();
    Ok(names)
}

/// Whole-file write-then-rename, so readers never observe a partially
/// written file (spec §5 ordering guarantees).
pub fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let tmp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|e| e.to_str()).unwrap_or("")
    ));
    fs::write(&tmp_path, contents)
        .with_context(|| format!("writing temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {} to {}", tmp_path.display(), path.display()))?;
    Ok(())
}
