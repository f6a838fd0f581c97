//! Configuration loader
//!
//! Loads the immutable settings record (spec §3 Config) from a TOML file.
//! Required directory fields have no defaults and are validated explicitly
//! so a missing one produces the specific `CONFIG_MISSING_*` message rather
//! than a generic deserialization error.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::errors::{messages, ParseError, ParseResult};

fn default_primary_tz() -> String {
    "UTC".to_string()
}

fn default_end_time_hr() -> u32 {
    23
}

fn default_end_time_min() -> u32 {
    55
}

fn default_ignore_regex() -> Vec<String> {
    vec![r".*~$".to_string(), r".*\.bak$".to_string(), r".*\$$".to_string()]
}

#[derive(Debug, Clone, Deserialize)]
struct RawConfig {
    log_dir: Option<String>,
    family_dir: Option<String>,
    job_dir: Option<String>,
    instructions_dir: Option<String>,
    #[serde(default = "default_primary_tz")]
    primary_tz: String,
    #[serde(default = "default_end_time_hr")]
    end_time_hr: u32,
    #[serde(default = "default_end_time_min")]
    end_time_min: u32,
    #[serde(default)]
    once_only: bool,
    #[serde(default)]
    run_local: bool,
    #[serde(default)]
    num_retries: i32,
    #[serde(default = "default_retry_sleep")]
    retry_sleep: i32,
    #[serde(default = "default_ignore_regex")]
    ignore_regex: Vec<String>,
    #[serde(default)]
    calendars: HashMap<String, Vec<String>>,
    #[serde(default)]
    tokens: HashMap<String, u32>,
}

fn default_retry_sleep() -> i32 {
    1
}

/// Immutable settings record (spec §3 Config).
#[derive(Debug, Clone)]
pub struct Config {
    pub log_dir: String,
    pub family_dir: String,
    pub job_dir: String,
    pub instructions_dir: String,
    pub primary_tz: String,
    pub end_time_hr: u32,
    pub end_time_min: u32,
    pub once_only: bool,
    pub run_local: bool,
    pub num_retries: i32,
    pub retry_sleep: i32,
    pub ignore_regex: Vec<String>,
    pub calendars: HashMap<String, Vec<String>>,
    pub tokens: HashMap<String, u32>,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> ParseResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ParseError::new(messages::CONFIG_PARSE_FAILED, e))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> ParseResult<Self> {
        let raw: RawConfig =
            toml::from_str(text).map_err(|e| ParseError::new(messages::CONFIG_PARSE_FAILED, e))?;

        let log_dir = raw
            .log_dir
            .ok_or_else(|| ParseError::bare(messages::CONFIG_MISSING_LOG_DIR))?;
        let family_dir = raw
            .family_dir
            .ok_or_else(|| ParseError::bare(messages::CONFIG_MISSING_FAMILY_DIR))?;
        let job_dir = raw
            .job_dir
            .ok_or_else(|| ParseError::bare(messages::CONFIG_MISSING_JOB_DIR))?;
        let instructions_dir = raw
            .instructions_dir
            .ok_or_else(|| ParseError::bare(messages::CONFIG_MISSING_INSTRUCTIONS_DIR))?;

        Ok(Self {
            log_dir,
            family_dir,
            job_dir,
            instructions_dir,
            primary_tz: raw.primary_tz,
            end_time_hr: raw.end_time_hr,
            end_time_min: raw.end_time_min,
            once_only: raw.once_only,
            run_local: raw.run_local,
            num_retries: raw.num_retries,
            retry_sleep: raw.retry_sleep,
            ignore_regex: raw.ignore_regex,
            calendars: raw.calendars,
            tokens: raw.tokens,
        })
    }
}
