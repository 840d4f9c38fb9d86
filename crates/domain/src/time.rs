//! Time and timestamp helpers.

use chrono::{DateTime, NaiveTime, Utc};

use crate::error::ValidationError;

/// UTC timestamp used for `last_auto_on`, `power_low_since`, etc.
pub type Timestamp = DateTime<Utc>;

/// Format used for schedule bounds in configuration.
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse an `HH:MM:SS` time of day.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidTimeOfDay`] when the input does not
/// match [`TIME_OF_DAY_FORMAT`].
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, TIME_OF_DAY_FORMAT)
        .map_err(|_| ValidationError::InvalidTimeOfDay(value.to_string()))
}
