//! Clock abstraction module
//!
//! One process-wide clock provides `now(tz)` and `sleep(duration)`.
//! Production code uses the real wall clock; tests inject a mock that
//! advances a stored instant on sleep and returns it from `now`, mirroring
//! `pytf.mockdatetime.MockDateTime` in the original scheduler.

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

/// Abstract "now in timezone T" plus sleep, so the main loop and dependency
/// evaluation never call `chrono::Utc::now()` or `std::thread::sleep`
/// directly.
#[cfg_attr(test, automock)]
pub trait Clock: Send + Sync {
    /// Current instant, converted into the given IANA timezone.
    fn now(&self, tz: Tz) -> DateTime<Tz>;

    /// Suspend the calling thread for `duration`. A mock clock instead
    /// advances its stored instant by the same amount.
    fn sleep(&self, duration: Duration);
}

/// Parses an IANA timezone name. An unknown zone name is always an error at
/// the call site, never silently coerced to UTC.
pub fn parse_tz(name: &str) -> Option<Tz> {
    name.parse::<Tz>().ok()
}

/// Today's (year, month, day) in the given timezone, as consumed by the
/// calendar engine.
pub fn today(clock: &dyn Clock, tz: Tz) -> (i32, u32, u32) {
    let now = clock.now(tz);
    (now.year(), now.month(), now.day())
}
