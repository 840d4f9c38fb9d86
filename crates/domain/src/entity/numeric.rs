//! Numeric sensor state (power in watts, relative humidity in percent).

use serde::{Deserialize, Serialize};

/// Value reported by a numeric sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericState {
    Value(f64),
    Unknown,
    Unavailable,
}

impl NumericState {
    /// The numeric value, or `None` for unknown/unavailable markers.
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unknown | Self::Unavailable => None,
        }
    }
}

impl std::fmt::Display for NumericState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Unknown => f.write_str("unknown"),
            Self::Unavailable => f.write_str("unavailable"),
        }
    }
}
