//! The single error type surfaced by every parse-time and operator-action
//! failure in the scheduler.

use thiserror::Error;

/// Canonical message prefixes. Kept as constants because tests assert on
/// them verbatim and several call sites share a prefix.
pub mod messages {
    pub const PARSE_EXCEPTION: &str = "Parse Exception";
    pub const JOB_INNER_PARSE_FAILED: &str = "Job inner data parsing failed";
    pub const START_TIME_FOR_JOB: &str = "Start Time Parsing failed for job:";
    pub const UNTIL_TIME_FOR_JOB: &str = "Until Time Parsing failed for job:";
    pub const UNRECOGNIZED_JOB_PARAM: &str = "Unrecognized job parameter for job:";
    pub const INVALID_TYPE: &str = "Invalid Type for job/key:";
    pub const START_TIME_FOR_FAMILY: &str = "Start Time Parsing failed for family:";
    pub const FAMILY_FIRST_LINE_PARSE_FAILED: &str = "First line of family failed to parse:";
    pub const CAL_AND_DAYS: &str = "Cannot have both Calendar and Days specified";
    pub const UNKNOWN_CALENDAR: &str = "Unknown Calendar:";
    pub const JOB_TWICE: &str = "Job appears twice in family:";
    pub const REPEATING_JOBS_ALONE: &str =
        "Repeating jobs should be alone in their forest in family:";
    pub const CALENDAR_INVALID_RULE: &str = "Invalid Calendar Rule:";
    pub const CALENDAR_DANGLING_OFFSET: &str = "No specifier after offset:";
    pub const CALENDAR_OFFSET_AND_DATE: &str =
        "Date of month not allowed when specifying day of week:";
    pub const CALENDAR_INVALID_DATE: &str = "Invalid date:";
    pub const CALENDAR_UNKNOWN_WEEKDAY: &str = "Unknown weekday:";
    pub const CONFIG_PARSE_FAILED: &str = "Failed to parse config file";
    pub const CONFIG_MISSING_LOG_DIR: &str = "Failed to parse config file - Missing log dir";
    pub const CONFIG_MISSING_FAMILY_DIR: &str =
        "Failed to parse config file - Missing family dir";
    pub const CONFIG_MISSING_JOB_DIR: &str = "Failed to parse config file - Missing job dir";
    pub const CONFIG_MISSING_INSTRUCTIONS_DIR: &str =
        "Failed to parse config file - Missing instructions dir";
    pub const CANT_FIND_SINGLE_INFO_FILE: &str = "Can't find single job info file:";
}

/// The scheduler's single error kind. Every variant carries a fully formed
/// message (prefix + detail) so callers can print it verbatim to stderr.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ParseError(pub String);

impl ParseError {
    pub fn new(prefix: &str, detail: impl std::fmt::Display) -> Self {
        Self(format!("{prefix} {detail}"))
    }

    pub fn bare(prefix: &str) -> Self {
        Self(prefix.to_string())
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
