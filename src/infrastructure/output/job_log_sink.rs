//! Per-job log sink
//!
//! The worker runner's `*.log` file (spec §3, §4.7), a direct file writer
//! distinct from the process-level `tracing` subscriber — mirrors
//! `pytf_worker.py`'s per-job `logging.FileHandler`, one file per attempt,
//! stdout lines at info level and stderr lines at error level.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

pub struct JobLogSink {
    file: File,
}

impl JobLogSink {
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("creating job log {}", path.display()))?;
        Ok(Self { file })
    }

    fn write_line(&mut self, level: &str, line: &str) -> Result<()> {
        let stamp = Local::now().format("%Y-%m-%dT%H:%M:%S%z");
        writeln!(self.file, "{stamp} {level} {line}").context("writing job log line")
    }

    pub fn info(&mut self, line: &str) -> Result<()> {
        self.write_line("INFO", line)
    }

    pub fn error(&mut self, line: &str) -> Result<()> {
        self.write_line("ERROR", line)
    }
}
