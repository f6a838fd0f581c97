//! System clock implementation
//!
//! The production `Clock`: wraps `chrono::Utc::now()` and
//! `std::thread::sleep`.

use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::domain::clock::Clock;

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self, tz: Tz) -> DateTime<Tz> {
        Utc::now().with_timezone(&tz)
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_reports_requested_timezone_offset() {
        let clock = SystemClock::new();
        let utc_now = clock.now(chrono_tz::UTC);
        let tokyo_now = clock.now(chrono_tz::Asia::Tokyo);
        assert_eq!(utc_now.timestamp(), tokyo_now.timestamp());
    }
}
