//! Daily operating window, possibly crossing midnight.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A daily time-of-day window with inclusive bounds.
///
/// When `start < end` the window is the single interval `[start, end]`.
/// Otherwise it wraps midnight: a time is inside when it is at or after
/// `start`, or at or before `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ScheduleWindow {
    #[must_use]
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Whether the window wraps past midnight.
    #[must_use]
    pub fn crosses_midnight(&self) -> bool {
        self.start >= self.end
    }

    /// Whether `time` lies inside the window.
    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.crosses_midnight() {
            time >= self.start || time <= self.end
        } else {
            self.start <= time && time <= self.end
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn should_contain_time_inside_daytime_window() {
        let window = ScheduleWindow::new(t(9, 0), t(20, 0));
        assert!(window.contains(t(12, 0)));
    }

    #[test]
    fn should_include_both_bounds_of_daytime_window() {
        let window = ScheduleWindow::new(t(9, 0), t(20, 0));
        assert!(window.contains(t(9, 0)));
        assert!(window.contains(t(20, 0)));
    }

    #[test]
    fn should_exclude_time_outside_daytime_window() {
        let window = ScheduleWindow::new(t(9, 0), t(20, 0));
        assert!(!window.contains(t(8, 59)));
        assert!(!window.contains(t(23, 0)));
    }

    #[test]
    fn should_wrap_midnight_when_start_after_end() {
        let window = ScheduleWindow::new(t(22, 0), t(6, 0));
        assert!(window.crosses_midnight());
        assert!(window.contains(t(23, 0)));
        assert!(window.contains(t(0, 0)));
        assert!(window.contains(t(6, 0)));
        assert!(!window.contains(t(12, 0)));
        assert!(!window.contains(t(21, 59)));
    }

    #[test]
    fn should_cover_whole_day_when_start_equals_end() {
        let window = ScheduleWindow::new(t(8, 0), t(8, 0));
        assert!(window.crosses_midnight());
        for hour in 0..24 {
            assert!(window.contains(t(hour, 30)));
        }
    }
}
