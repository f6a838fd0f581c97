//! Family/forest parser and dependency compiler
//!
//! Turns one family text file into a `Family` value: header fields, the
//! forest structure, and each internal job's compiled dependency set
//! (spec §4.2).

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::entities::{
    CalendarOrDays, Days, Dependency, ExternalDependency, Family, Forest, ForestItem, Job,
};
use crate::domain::errors::{messages, ParseError, ParseResult};
use crate::domain::value_objects::TimeOfDay;
use crate::infrastructure::config::Config;
use crate::infrastructure::parsers::toml_inner::{
    get_bool, get_int, get_str, get_str_list, get_time, parse_inner_table, validate_keys,
};

const FAMILY_VALID_KEYS: &[&str] = &[
    "start",
    "tz",
    "calendar",
    "days",
    "queue",
    "email",
    "retry_email",
    "retry_success-email",
    "no_retry_email",
    "no_retry_success_email",
    "comment",
];

const JOB_VALID_KEYS: &[&str] = &[
    "start",
    "until",
    "tz",
    "every",
    "chained",
    "tokens",
    "num_retries",
    "retry_sleep_min",
    "queue",
    "email",
    "retry_email",
    "retry_success-email",
    "no_retry_email",
    "no_retry_success_email",
    "comment",
];

fn job_call_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([^(]+\([^)]*\))").unwrap())
}

fn internal_job_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([0-9A-Za-z_]+)\((.*)\)\s*$").unwrap())
}

fn external_job_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([0-9A-Za-z_]+)::([0-9A-Za-z_]+)\((.*)\)\s*$").unwrap())
}

fn dashes_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[- ]+$").unwrap())
}

fn comment_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#.*").unwrap())
}

enum RawItem {
    Internal(Job),
    External(ExternalDependency),
}

/// Parses one family file's full text into a `Family`.
pub fn parse_family(name: &str, text: &str, config: &Config) -> ParseResult<Family> {
    let mut lines = text.split('\n');
    let header = lines
        .by_ref()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("");

    let header_table = parse_inner_table(
        header,
        &format!("{} {header}", messages::FAMILY_FIRST_LINE_PARSE_FAILED),
    )?;

    validate_keys(&header_table, FAMILY_VALID_KEYS, name)?;

    let start_time = get_time(&header_table, "start", || {
        ParseError::new(messages::START_TIME_FOR_FAMILY, name)
    })?
    .ok_or_else(|| ParseError::new(messages::START_TIME_FOR_FAMILY, name))?;

    let tz = get_str(&header_table, "tz", name)?;
    let queue = get_str(&header_table, "queue", name)?;
    let email = get_str(&header_table, "email", name)?;
    let retry_email = get_str(&header_table, "retry_email", name)?;
    let retry_success_email = get_str(&header_table, "retry_success-email", name)?;
    let no_retry_email = get_bool(&header_table, "no_retry_email", name)?;
    let no_retry_success_email = get_bool(&header_table, "no_retry_success_email", name)?;
    let comment = get_str(&header_table, "comment", name)?;

    let calendar_name = get_str(&header_table, "calendar", name)?;
    let days_list = get_str_list(&header_table, "days", name)?;
    if calendar_name.is_some() && days_list.is_some() {
        return Err(ParseError::bare(messages::CAL_AND_DAYS));
    }
    let calendar_or_days = if let Some(calendar_name) = calendar_name {
        if !config.calendars.contains_key(&calendar_name) {
            return Err(ParseError::new(messages::UNKNOWN_CALENDAR, &calendar_name));
        }
        CalendarOrDays::Calendar(calendar_name)
    } else if let Some(days_list) = days_list {
        CalendarOrDays::Days(Days::parse(&days_list)?)
    } else {
        CalendarOrDays::Days(Days::all())
    };

    let mut family = Family::new(name, start_time, calendar_or_days);
    family.tz = tz;
    family.queue = queue;
    family.email = email;
    family.retry_email = retry_email;
    family.retry_success_email = retry_success_email;
    family.no_retry_email = no_retry_email;
    family.no_retry_success_email = no_retry_success_email;
    family.comment = comment;

    let mut raw_forests: Vec<Vec<Vec<RawItem>>> = vec![Vec::new()];
    for line in lines {
        let stripped = comment_pattern().replace(line, "");
        let stripped = stripped.trim();
        if stripped.is_empty() {
            continue;
        }
        if dashes_pattern().is_match(stripped) {
            if !raw_forests.last().unwrap().is_empty() {
                raw_forests.push(Vec::new());
            }
            continue;
        }
        let line_items = split_jobs(stripped, name)?;
        raw_forests.last_mut().unwrap().push(line_items);
    }
    if raw_forests.last().map(Vec::is_empty).unwrap_or(false) {
        raw_forests.pop();
    }

    let default_until = TimeOfDay::new(config.end_time_hr, config.end_time_min);
    let family_tz = family.effective_tz(&config.primary_tz).to_string();

    for raw_lines in raw_forests {
        let forest = compile_forest(raw_lines, &mut family, &family_tz, default_until)?;
        family.forests.push(forest);
    }

    Ok(family)
}

fn split_jobs(line: &str, family_name: &str) -> ParseResult<Vec<RawItem>> {
    let mut items = Vec::new();
    for m in job_call_pattern().find_iter(line) {
        let token = m.as_str().trim();
        if let Some(caps) = external_job_pattern().captures(token) {
            items.push(RawItem::External(ExternalDependency {
                family_name: caps[1].to_string(),
                job_name: caps[2].to_string(),
            }));
        } else if let Some(caps) = internal_job_pattern().captures(token) {
            let job_name = caps[1].to_string();
            let inner = &caps[2];
            let job = parse_job(&job_name, inner, family_name)?;
            items.push(RawItem::Internal(job));
        }
    }
    Ok(items)
}

fn parse_job(job_name: &str, inner: &str, family_name: &str) -> ParseResult<Job> {
    let table = parse_inner_table(inner, messages::JOB_INNER_PARSE_FAILED)?;
    validate_keys(&table, JOB_VALID_KEYS, job_name)?;

    let mut job = Job::new(job_name, family_name);
    job.start_time = get_time(&table, "start", || {
        ParseError::new(messages::START_TIME_FOR_JOB, job_name)
    })?;
    job.until_time = get_time(&table, "until", || {
        ParseError::new(messages::UNTIL_TIME_FOR_JOB, job_name)
    })?;
    job.tz = get_str(&table, "tz", job_name)?;
    job.every_seconds = get_int(&table, "every", job_name)?.map(|n| n as u32);
    job.chained = get_bool(&table, "chained", job_name)?.unwrap_or(false);
    job.tokens = get_str_list(&table, "tokens", job_name)?.unwrap_or_default();
    job.num_retries = get_int(&table, "num_retries", job_name)?.unwrap_or(0) as i32;
    job.retry_sleep_min = get_int(&table, "retry_sleep_min", job_name)?.unwrap_or(1) as i32;
    job.queue = get_str(&table, "queue", job_name)?.unwrap_or_else(|| "default".to_string());
    job.email = get_str(&table, "email", job_name)?;
    job.retry_email = get_str(&table, "retry_email", job_name)?;
    job.retry_success_email = get_str(&table, "retry_success-email", job_name)?;
    job.no_retry_email = get_bool(&table, "no_retry_email", job_name)?.unwrap_or(false);
    job.no_retry_success_email = get_bool(&table, "no_retry_success_email", job_name)?.unwrap_or(false);
    job.comment = get_str(&table, "comment", job_name)?;

    Ok(job)
}

/// Turns one forest's raw job lines into a compiled `Forest`, inserting
/// every internal job into `family.jobs_by_name` with its dependency set
/// filled in (spec §4.2).
fn compile_forest(
    raw_lines: Vec<Vec<RawItem>>,
    family: &mut Family,
    family_tz: &str,
    default_until: TimeOfDay,
) -> ParseResult<Forest> {
    let total_items: usize = raw_lines.iter().map(Vec::len).sum();
    let is_repeating = raw_lines
        .iter()
        .flatten()
        .any(|item| matches!(item, RawItem::Internal(job) if job.is_repeating()));

    if is_repeating && total_items != 1 {
        return Err(ParseError::new(messages::REPEATING_JOBS_ALONE, &family.name));
    }

    let mut forest = Forest::new();
    let mut prev_line_deps: BTreeSet<Dependency> = BTreeSet::new();
    let family_start_dep = Dependency::time(
        family.start_time.hour,
        family.start_time.minute,
        family_tz.to_string(),
    );

    for raw_line in raw_lines {
        let mut line_items = Vec::new();
        let mut next_prev_deps: BTreeSet<Dependency> = BTreeSet::new();

        let expanded: Vec<RawItem> = if is_repeating {
            let RawItem::Internal(job) = raw_line.into_iter().next().unwrap() else {
                unreachable!("repeating forest already validated to hold a single internal job")
            };
            job.expand_repeating(default_until)
                .into_iter()
                .map(RawItem::Internal)
                .collect()
        } else {
            raw_line
        };

        for item in expanded {
            match item {
                RawItem::Internal(mut job) => {
                    let mut deps = prev_line_deps.clone();
                    deps.insert(family_start_dep.clone());
                    if let Some(start) = job.start_time {
                        let tz = job.tz.clone().unwrap_or_else(|| family_tz.to_string());
                        deps.insert(Dependency::time(start.hour, start.minute, tz));
                    }
                    job.dependencies = deps;

                    next_prev_deps.insert(Dependency::job(&family.name, &job.job_name));
                    line_items.push(ForestItem::Internal(job.job_name.clone()));
                    family.insert_job(job)?;
                }
                RawItem::External(ext) => {
                    next_prev_deps.insert(Dependency::external(&ext.family_name, &ext.job_name));
                    line_items.push(ForestItem::External(ext));
                }
            }
        }

        forest.push_line(line_items);
        prev_line_deps = next_prev_deps;
    }

    Ok(forest)
}

/// Lists family file names already present under the dated family dir,
/// parsing each with `parse_family` in filename-sort order, applying
/// `ignore_regex` (spec §4.6 step 1).
pub fn parse_all(
    family_dir: &std::path::Path,
    ignore: &[Regex],
    config: &Config,
) -> ParseResult<Vec<Family>> {
    let paths = crate::infrastructure::dirs::list_files_ignoring(family_dir, ignore)
        .map_err(|e| ParseError::new(messages::PARSE_EXCEPTION, e))?;

    let mut families = Vec::with_capacity(paths.len());
    let mut seen: HashMap<String, ()> = HashMap::new();
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = std::fs::read_to_string(&path)
            .map_err(|e| ParseError::new(messages::PARSE_EXCEPTION, e))?;
        families.push(parse_family(&name, &text, config)?);
        seen.insert(name, ());
    }
    Ok(families)
}
