//! Family entity module
//!
//! Parsed from one family text file (spec §3). Owns every `Job` in
//! `jobs_by_name`; forests reference jobs by name so each job has a single
//! owner. Exactly one of `calendar_or_days` is set.

use std::collections::HashMap;

use chrono::Weekday;

use crate::domain::entities::{Calendar, Days, Forest, Job};
use crate::domain::errors::{messages, ParseError, ParseResult};
use crate::domain::value_objects::TimeOfDay;

#[derive(Debug, Clone, PartialEq)]
pub enum CalendarOrDays {
    Calendar(String),
    Days(Days),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Family {
    pub name: String,
    pub tz: Option<String>,
    pub start_time: TimeOfDay,
    pub calendar_or_days: CalendarOrDays,
    pub queue: Option<String>,
    pub email: Option<String>,
    pub retry_email: Option<String>,
    pub retry_success_email: Option<String>,
    pub no_retry_email: Option<bool>,
    pub no_retry_success_email: Option<bool>,
    pub comment: Option<String>,
    pub forests: Vec<Forest>,
    pub jobs_by_name: HashMap<String, Job>,
}

impl Family {
    pub fn new(name: impl Into<String>, start_time: TimeOfDay, calendar_or_days: CalendarOrDays) -> Self {
        Self {
            name: name.into(),
            tz: None,
            start_time,
            calendar_or_days,
            queue: None,
            email: None,
            retry_email: None,
            retry_success_email: None,
            no_retry_email: None,
            no_retry_success_email: None,
            comment: None,
            forests: Vec::new(),
            jobs_by_name: HashMap::new(),
        }
    }

    pub fn effective_tz<'a>(&'a self, primary_tz: &'a str) -> &'a str {
        self.tz.as_deref().unwrap_or(primary_tz)
    }

    /// Inserts `job`, raising `JOB_TWICE` if its name is already taken by
    /// another internal job in this family (spec §4.2).
    pub fn insert_job(&mut self, job: Job) -> ParseResult<()> {
        if self.jobs_by_name.contains_key(&job.job_name) {
            return Err(ParseError::new(messages::JOB_TWICE, &job.job_name));
        }
        self.jobs_by_name.insert(job.job_name.clone(), job);
        Ok(())
    }

    pub fn job(&self, job_name: &str) -> Option<&Job> {
        self.jobs_by_name.get(job_name)
    }

    pub fn job_mut(&mut self, job_name: &str) -> Option<&mut Job> {
        self.jobs_by_name.get_mut(job_name)
    }

    /// Whether this family is scheduled to run on the given date, resolving
    /// a named calendar against the config's calendar table.
    pub fn runs_on(
        &self,
        year: i32,
        month: u32,
        day: u32,
        weekday: Weekday,
        calendars: &HashMap<String, Calendar>,
    ) -> ParseResult<bool> {
        match &self.calendar_or_days {
            CalendarOrDays::Calendar(name) => {
                let calendar = calendars
                    .get(name)
                    .ok_or_else(|| ParseError::new(messages::UNKNOWN_CALENDAR, name))?;
                calendar.is_date_included(year, month, day)
            }
            CalendarOrDays::Days(days) => Ok(days.includes(weekday)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_job_name_is_an_error() {
        let mut family = Family::new("F1", TimeOfDay::new(2, 0), CalendarOrDays::Days(Days::all()));
        family.insert_job(Job::new("J1", "F1")).unwrap();
        assert!(family.insert_job(Job::new("J1", "F1")).is_err());
    }

    #[test]
    fn unknown_calendar_name_is_an_error() {
        let family = Family::new(
            "F1",
            TimeOfDay::new(2, 0),
            CalendarOrDays::Calendar("does-not-exist".to_string()),
        );
        let calendars = HashMap::new();
        assert!(family.runs_on(2024, 6, 3, Weekday::Mon, &calendars).is_err());
    }

    #[test]
    fn effective_tz_falls_back_to_primary() {
        let family = Family::new("F1", TimeOfDay::new(2, 0), CalendarOrDays::Days(Days::all()));
        assert_eq!(family.effective_tz("UTC"), "UTC");
    }
}
