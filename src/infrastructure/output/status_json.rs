//! Status JSON output
//!
//! The external status format (spec §6): `{"status": {"flat_list": [...],
//! "family": {"<name>": [...]}}}`, where each entry is a `JobResult`
//! serialized exactly as the info-file schema (spec §3).

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::entities::JobResult;

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub flat_list: Vec<JobResult>,
    pub family: BTreeMap<String, Vec<JobResult>>,
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub status: StatusBody,
}

impl StatusReport {
    /// Builds the report from a flat, family-then-job-name ordered list
    /// (spec §4.4 "Output is both a flat list... and a per-family
    /// grouping"). The flat list's order is preserved verbatim; the
    /// per-family grouping is derived from it.
    pub fn from_flat_list(flat_list: Vec<JobResult>) -> Self {
        let mut family: BTreeMap<String, Vec<JobResult>> = BTreeMap::new();
        for result in &flat_list {
            family
                .entry(result.family_name.clone())
                .or_default()
                .push(result.clone());
        }
        Self { status: StatusBody { flat_list, family } }
    }
}

pub fn write_status_json(path: &Path, report: &StatusReport) -> Result<()> {
    let text = serde_json::to_string_pretty(report).context("serializing status report")?;
    std::fs::write(path, text).with_context(|| format!("writing status report {}", path.display()))
}
