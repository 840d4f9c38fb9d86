//! Tick snapshot: the read-only result of one engine evaluation.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Result of one evaluation, published until the next tick supersedes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub is_on: bool,
    pub is_full: bool,
    pub inside_schedule: bool,
    pub humidity_low: bool,
    pub humidity_high: bool,
    pub manual_override: bool,
    pub evaluated_at: Timestamp,
}

impl TickSnapshot {
    /// Human-readable status derived from this snapshot.
    #[must_use]
    pub fn status(&self) -> Status {
        if self.is_full {
            Status::Full
        } else if !self.inside_schedule {
            Status::OutsideSchedule
        } else if self.humidity_low {
            Status::BelowTarget
        } else if self.is_on {
            Status::Dehumidifying
        } else {
            Status::Idle
        }
    }
}

/// Status shown by the controller's status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Full,
    OutsideSchedule,
    BelowTarget,
    Dehumidifying,
    Idle,
}

impl Status {
    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Full => "Full",
            Self::OutsideSchedule => "Outside dehumidifying hours",
            Self::BelowTarget => "Below target humidity",
            Self::Dehumidifying => "Dehumidifying",
            Self::Idle => "Idle",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
