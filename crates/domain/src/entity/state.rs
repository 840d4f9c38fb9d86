//! Switch state: the on/off value of a switch-like entity.

use serde::{Deserialize, Serialize};

/// Discrete operational state of a switch entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    On,
    Off,
    #[default]
    Unknown,
    Unavailable,
}

impl EntityState {
    /// Whether the entity reports a usable on/off value.
    #[must_use]
    pub fn is_available(self) -> bool {
        matches!(self, Self::On | Self::Off)
    }

    /// Whether the entity is on.
    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// The on/off value, or `None` for unknown/unavailable.
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::On => Some(true),
            Self::Off => Some(false),
            Self::Unknown | Self::Unavailable => None,
        }
    }

    /// Map a boolean to [`On`](Self::On) / [`Off`](Self::Off).
    #[must_use]
    pub fn from_bool(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Unknown => f.write_str("unknown"),
            Self::Unavailable => f.write_str("unavailable"),
        }
    }
}

impl std::str::FromStr for EntityState {
    type Err = UnknownEntityState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            "unknown" => Ok(Self::Unknown),
            "unavailable" => Ok(Self::Unavailable),
            other => Err(UnknownEntityState(other.to_string())),
        }
    }
}

/// Returned when parsing a string that is not a known [`EntityState`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity state {0:?}")]
pub struct UnknownEntityState(pub String);
