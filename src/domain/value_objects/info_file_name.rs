//! Info/log file name value object module
//!
//! Parses and builds the filename grammar from spec §6:
//! `Family.Job.Queue.Worker.Timestamp.(info|log)`, with
//! `Timestamp = YYYYMMDDhhmmss`. Rerun-preserved files carry the suffix
//! directly in the job component: `Family.Job-Orig-N.Queue.Worker.Timestamp.info`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Info,
    Log,
}

impl FileKind {
    fn extension(self) -> &'static str {
        match self {
            FileKind::Info => "info",
            FileKind::Log => "log",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoFileName {
    pub family_name: String,
    pub job_name: String,
    pub queue_name: String,
    pub worker_name: String,
    pub timestamp: String,
    pub kind: FileKind,
}

impl InfoFileName {
    pub fn new(
        family_name: impl Into<String>,
        job_name: impl Into<String>,
        queue_name: impl Into<String>,
        worker_name: impl Into<String>,
        timestamp: impl Into<String>,
        kind: FileKind,
    ) -> Self {
        Self {
            family_name: family_name.into(),
            job_name: job_name.into(),
            queue_name: queue_name.into(),
            worker_name: worker_name.into(),
            timestamp: timestamp.into(),
            kind,
        }
    }

    /// Parses a filename of the `Family.Job.Queue.Worker.Timestamp.ext`
    /// shape. Returns `None` for anything that doesn't split into exactly
    /// six dot-separated components or whose extension isn't `info`/`log`.
    pub fn parse(filename: &str) -> Option<Self> {
        let parts: Vec<&str> = filename.split('.').collect();
        if parts.len() != 6 {
            return None;
        }
        let kind = match parts[5] {
            "info" => FileKind::Info,
            "log" => FileKind::Log,
            _ => return None,
        };
        Some(Self::new(parts[0], parts[1], parts[2], parts[3], parts[4], kind))
    }

    /// The `-Orig-N` suffix attached to this file's job component, if any
    /// (set by a rerun that preserved the prior attempt's info file).
    pub fn orig_suffix(&self) -> Option<u32> {
        let marker = "-Orig-";
        let idx = self.job_name.find(marker)?;
        self.job_name[idx + marker.len()..].parse().ok()
    }

    /// The job name with any `-Orig-N` suffix stripped, i.e. the name the
    /// scheduler's job graph actually uses.
    pub fn base_job_name(&self) -> &str {
        let marker = "-Orig-";
        match self.job_name.find(marker) {
            Some(idx) if self.orig_suffix().is_some() => &self.job_name[..idx],
            _ => &self.job_name,
        }
    }

    /// Returns a copy with the job component renamed to `<job>-Orig-<n>`,
    /// as `rerun` does to the file it's preserving.
    pub fn with_orig_suffix(&self, n: u32) -> Self {
        let mut renamed = self.clone();
        renamed.job_name = format!("{}-Orig-{n}", self.job_name);
        renamed
    }
}

impl fmt::Display for InfoFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}.{}.{}",
            self.family_name,
            self.job_name,
            self.queue_name,
            self.worker_name,
            self.timestamp,
            self.kind.extension()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_display_and_parse() {
        let name = InfoFileName::new("F1", "J1", "default", "x", "20240214021500", FileKind::Info);
        let rendered = name.to_string();
        assert_eq!(rendered, "F1.J1.default.x.20240214021500.info");
        let parsed = InfoFileName::parse(&rendered).unwrap();
        assert_eq!(parsed, name);
    }

    #[test]
    fn rejects_wrong_component_count() {
        assert!(InfoFileName::parse("F1.J1.default.info").is_none());
    }

    #[test]
    fn orig_suffix_roundtrips() {
        let name = InfoFileName::new("F1", "J1", "default", "x", "20240214021500", FileKind::Info);
        let renamed = name.with_orig_suffix(1);
        assert_eq!(renamed.job_name, "J1-Orig-1");
        assert_eq!(renamed.orig_suffix(), Some(1));
        assert_eq!(name.orig_suffix(), None);
    }

    #[test]
    fn base_job_name_strips_orig_suffix() {
        let name = InfoFileName::new("F1", "J1", "default", "x", "20240214021500", FileKind::Info);
        let renamed = name.with_orig_suffix(2);
        assert_eq!(renamed.base_job_name(), "J1");
        assert_eq!(name.base_job_name(), "J1");
    }
}
