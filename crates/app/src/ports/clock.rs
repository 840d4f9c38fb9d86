//! Clock port: wall-clock time for schedule evaluation.

use chrono::{DateTime, FixedOffset, Local};

/// Source of the current wall-clock time, in the offset whose time of day
/// the schedule is expressed in.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_time_close_to_utc_now() {
        let before = chrono::Utc::now();
        let now = SystemClock.now();
        let after = chrono::Utc::now();
        assert!(now >= before);
        assert!(now <= after);
    }
}
