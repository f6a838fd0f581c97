//! Calendar entity module
//!
//! Date-inclusion rule engine (spec §4.1). Rules are plain strings and are
//! parsed lazily, once per `is_date_included` call, matching the reference
//! implementation's behavior exactly rather than pre-compiling a rule AST.

use chrono::{Datelike, NaiveDate};

use crate::domain::errors::{messages, ParseError, ParseResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    pub calendar_name: String,
    pub rules: Vec<String>,
}

impl Calendar {
    pub fn new(calendar_name: impl Into<String>, rules: Vec<String>) -> Self {
        Self {
            calendar_name: calendar_name.into(),
            rules,
        }
    }

    pub fn is_date_included(&self, yyyy: i32, mm: u32, dd: u32) -> ParseResult<bool> {
        let naive_date = NaiveDate::from_ymd_opt(yyyy, mm, dd)
            .ok_or_else(|| ParseError::new(messages::CALENDAR_INVALID_DATE, format!("{yyyy}/{mm}/{dd}")))?;
        let naive_dow = naive_date.weekday().num_days_from_monday();

        let mut result = false;
        for rule in &self.rules {
            if let Some(m) = Self::does_rule_match(naive_date, naive_dow, rule)? {
                result = m;
            }
        }
        Ok(result)
    }

    fn does_rule_match(naive_date: NaiveDate, naive_dow: u32, rule: &str) -> ParseResult<Option<bool>> {
        let mut components: Vec<String> = rule.split_whitespace().map(str::to_string).collect();
        if components.is_empty() {
            return Err(ParseError::new(messages::CALENDAR_INVALID_RULE, "rule"));
        }

        let mut plus_or_minus = '+';
        if components.len() > 1 && (components[0] == "-" || components[0] == "+") {
            plus_or_minus = components.remove(0).chars().next().unwrap();
        }

        let mut nth: Option<i32> = None;
        let mut dow: Option<u32> = None;

        if let Some(base) = offset_value(&components[0]) {
            if components.len() < 2 {
                return Err(ParseError::new(messages::CALENDAR_DANGLING_OFFSET, &components[0]));
            }
            let mut n = base;
            if components[1].eq_ignore_ascii_case("last") {
                n = if n > 0 { -n } else { -1 };
                components.remove(1);
            }
            if components.len() < 2 {
                return Err(ParseError::new(messages::CALENDAR_DANGLING_OFFSET, &components[0]));
            }
            dow = Some(weekday_value(&components[1])?);
            nth = Some(n);
            components.remove(0);
            components.remove(0);
        }

        if components.is_empty() || components[0].is_empty() {
            return Ok(None);
        }

        let yyyymmdd = components[0].clone();
        let date_components: Vec<&str> = yyyymmdd.split('/').collect();
        if date_components.len() > 3 {
            return Err(ParseError::new(messages::CALENDAR_INVALID_DATE, &yyyymmdd));
        }
        if nth.is_some() && date_components.len() == 3 {
            return Err(ParseError::new(messages::CALENDAR_OFFSET_AND_DATE, &yyyymmdd));
        }

        let field = |idx: usize| date_components.get(idx).copied().unwrap_or("*");
        let parse_field = |s: &str| -> ParseResult<Option<i32>> {
            if s == "*" {
                Ok(None)
            } else {
                s.parse::<i32>()
                    .map(Some)
                    .map_err(|_| ParseError::new(messages::CALENDAR_INVALID_DATE, &yyyymmdd))
            }
        };
        let yyyy_v = parse_field(field(0))?;
        let mm_v = parse_field(field(1))?;
        let dd_v = parse_field(field(2))?;

        if yyyy_v.map(|y| y < 1970).unwrap_or(false)
            || mm_v.map(|m| !(1..=12).contains(&m)).unwrap_or(false)
            || dd_v.map(|d| !(1..=31).contains(&d)).unwrap_or(false)
        {
            return Err(ParseError::new(messages::CALENDAR_INVALID_DATE, &yyyymmdd));
        }

        let matches_year = yyyy_v.map(|y| y == naive_date.year()).unwrap_or(true);
        let matches_month = mm_v.map(|m| m as u32 == naive_date.month()).unwrap_or(true);
        let matches_day = dd_v.map(|d| d as u32 == naive_date.day()).unwrap_or(true);

        if !(matches_year && matches_month && matches_day) {
            return Ok(None);
        }

        let (Some(mut nth), Some(dow)) = (nth, dow) else {
            return Ok(Some(plus_or_minus == '+'));
        };

        if dow != naive_dow {
            return Ok(None);
        }

        if nth == 0 {
            return Ok(Some(plus_or_minus == '+'));
        }

        let dates = Self::find_days_of_week(naive_date.year(), naive_date.month(), dow);

        if nth > 0 {
            nth -= 1;
        }
        if nth == 4 && dates.len() < 5 {
            return Ok(Some(false));
        }

        let idx = if nth >= 0 {
            nth as usize
        } else {
            (dates.len() as i32 + nth) as usize
        };

        Ok(if dates.get(idx) == Some(&naive_date.day()) {
            Some(plus_or_minus == '+')
        } else {
            None
        })
    }

    /// Returns the 4 or 5 mdays in `yyyy-mm` that fall on weekday `dow`
    /// (Monday = 0 .. Sunday = 6).
    fn find_days_of_week(yyyy: i32, mm: u32, dow: u32) -> Vec<u32> {
        let first_of_month = NaiveDate::from_ymd_opt(yyyy, mm, 1).expect("valid y/m");
        let dow_of_first = first_of_month.weekday().num_days_from_monday();

        let first_dd: i64 = if dow_of_first <= dow {
            1 + dow as i64 - dow_of_first as i64
        } else {
            8 - (dow_of_first as i64 - dow as i64)
        };

        let mut days_in_month = [0u32, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        if is_leap_year(yyyy) {
            days_in_month[2] += 1;
        }
        let days_in_this_month = days_in_month[mm as usize] as i64;

        let mut result = vec![first_dd as u32];
        let mut next_dd = first_dd + 7;
        while next_dd <= days_in_this_month {
            result.push(next_dd as u32);
            next_dd += 7;
        }
        result
    }
}

fn is_leap_year(yyyy: i32) -> bool {
    (yyyy % 4 == 0 && yyyy % 100 != 0) || yyyy % 400 == 0
}

fn offset_value(token: &str) -> Option<i32> {
    match token.to_lowercase().as_str() {
        "first" => Some(1),
        "second" => Some(2),
        "third" => Some(3),
        "fourth" => Some(4),
        "fifth" => Some(5),
        "last" => Some(-1),
        "every" => Some(0),
        _ => None,
    }
}

fn weekday_value(token: &str) -> ParseResult<u32> {
    let lower = token.to_lowercase();
    let prefix = &lower[..lower.len().min(3)];
    match prefix {
        "mon" => Ok(0),
        "tue" => Ok(1),
        "wed" => Ok(2),
        "thu" => Ok(3),
        "fri" => Ok(4),
        "sat" => Ok(5),
        "sun" => Ok(6),
        _ => Err(ParseError::new(messages::CALENDAR_UNKNOWN_WEEKDAY, token)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_weekday_matches_any_occurrence() {
        let cal = Calendar::new("weekdays", vec!["every Mon */*".to_string()]);
        assert!(cal.is_date_included(2024, 6, 3).unwrap());
        assert!(!cal.is_date_included(2024, 6, 2).unwrap());
    }

    #[test]
    fn last_sunday_matches_june_2024() {
        let cal = Calendar::new("c", vec!["last Sun */*".to_string()]);
        assert!(cal.is_date_included(2024, 6, 30).unwrap());
        assert!(!cal.is_date_included(2024, 6, 23).unwrap());
    }

    #[test]
    fn fifth_sunday_requires_five_occurrences() {
        let cal = Calendar::new("c", vec!["fifth Sun */*".to_string()]);
        assert!(cal.is_date_included(2024, 6, 30).unwrap());
        let cal_no_fifth = Calendar::new("c", vec!["fifth Sun */*".to_string()]);
        assert!(!cal_no_fifth.is_date_included(2024, 7, 28).unwrap());
    }

    #[test]
    fn explicit_date_matches_exactly() {
        let cal = Calendar::new("c", vec!["2024/12/25".to_string()]);
        assert!(cal.is_date_included(2024, 12, 25).unwrap());
        assert!(!cal.is_date_included(2024, 12, 24).unwrap());
    }

    #[test]
    fn minus_rule_excludes_after_prior_inclusion() {
        let cal = Calendar::new(
            "c",
            vec!["every Mon */*".to_string(), "- 2024/6/3".to_string()],
        );
        assert!(!cal.is_date_included(2024, 6, 3).unwrap());
        assert!(cal.is_date_included(2024, 6, 10).unwrap());
    }

    #[test]
    fn dangling_offset_is_an_error() {
        let cal = Calendar::new("c", vec!["first".to_string()]);
        assert!(cal.is_date_included(2024, 6, 3).is_err());
    }

    #[test]
    fn offset_and_explicit_date_conflict() {
        let cal = Calendar::new("c", vec!["first Mon 2024/6/3".to_string()]);
        assert!(cal.is_date_included(2024, 6, 3).is_err());
    }

    #[test]
    fn find_days_of_week_matches_known_month() {
        let days = Calendar::find_days_of_week(2024, 6, 6);
        assert_eq!(days, vec![2, 9, 16, 23, 30]);
    }
}
