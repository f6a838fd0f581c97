//! Time of day value object module
//!
//! Wall-clock time-of-day, parsed from the family/job `"HHMM"` string
//! format used throughout family files (`start`, `until`, and the config's
//! `end_time_hr`/`end_time_min` pair).

use serde::{Deserialize, Serialize};
use std::fmt;

/// An hour/minute pair with no date or timezone attached. The timezone a
/// `TimeOfDay` is evaluated against always comes from somewhere else (the
/// owning job, family, or config).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    /// Parses the `"HHMM"` format used by family files, e.g. `"0330"` ->
    /// `03:30`. Returns `None` if the string isn't exactly 4 digits or the
    /// digits don't form a valid hour/minute.
    pub fn parse_hhmm(raw: &str) -> Option<Self> {
        if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let hour: u32 = raw[..2].parse().ok()?;
        let minute: u32 = raw[2..].parse().ok()?;
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self { hour, minute })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_hhmm() {
        assert_eq!(TimeOfDay::parse_hhmm("0330"), Some(TimeOfDay::new(3, 30)));
        assert_eq!(TimeOfDay::parse_hhmm("2359"), Some(TimeOfDay::new(23, 59)));
        assert_eq!(TimeOfDay::parse_hhmm("0000"), Some(TimeOfDay::new(0, 0)));
    }

    #[test]
    fn rejects_malformed_hhmm() {
        assert_eq!(TimeOfDay::parse_hhmm("930"), None);
        assert_eq!(TimeOfDay::parse_hhmm("99999"), None);
        assert_eq!(TimeOfDay::parse_hhmm("2460"), None);
        assert_eq!(TimeOfDay::parse_hhmm("abcd"), None);
    }

    #[test]
    fn display_pads_zero() {
        assert_eq!(TimeOfDay::new(3, 5).to_string(), "03:05");
    }
}
