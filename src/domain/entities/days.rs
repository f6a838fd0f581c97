//! Days entity module
//!
//! Alternative to [`Calendar`](super::calendar::Calendar): a fixed set of
//! three-letter weekday abbreviations a family runs on (spec §3). The
//! default, when a family specifies neither `calendar` nor `days`, is all
//! seven days.

use std::collections::HashSet;

use chrono::Weekday;

use crate::domain::errors::{messages, ParseError, ParseResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Days {
    weekdays: HashSet<Weekday>,
}

impl Days {
    pub fn all() -> Self {
        Self {
            weekdays: [
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun,
            ]
            .into_iter()
            .collect(),
        }
    }

    pub fn parse(tokens: &[String]) -> ParseResult<Self> {
        let mut weekdays = HashSet::new();
        for token in tokens {
            weekdays.insert(parse_weekday(token)?);
        }
        Ok(Self { weekdays })
    }

    pub fn includes(&self, weekday: Weekday) -> bool {
        self.weekdays.contains(&weekday)
    }
}

fn parse_weekday(token: &str) -> ParseResult<Weekday> {
    let lower = token.to_lowercase();
    let prefix = &lower[..lower.len().min(3)];
    match prefix {
        "mon" => Ok(Weekday::Mon),
        "tue" => Ok(Weekday::Tue),
        "wed" => Ok(Weekday::Wed),
        "thu" => Ok(Weekday::Thu),
        "fri" => Ok(Weekday::Fri),
        "sat" => Ok(Weekday::Sat),
        "sun" => Ok(Weekday::Sun),
        _ => Err(ParseError::new(messages::CALENDAR_UNKNOWN_WEEKDAY, token)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_includes_every_day() {
        let days = Days::all();
        assert!(days.includes(Weekday::Sun));
        assert!(days.includes(Weekday::Mon));
    }

    #[test]
    fn parses_three_letter_abbreviations() {
        let days = Days::parse(&["Mon".to_string(), "Wed".to_string(), "Fri".to_string()]).unwrap();
        assert!(days.includes(Weekday::Mon));
        assert!(!days.includes(Weekday::Tue));
    }

    #[test]
    fn rejects_unknown_weekday() {
        assert!(Days::parse(&["Xyz".to_string()]).is_err());
    }
}
