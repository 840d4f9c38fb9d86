//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`DryPlugError`] via `#[from]` at the port boundary.

/// Top-level error returned by ports and application services.
#[derive(Debug, thiserror::Error)]
pub enum DryPlugError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced controller or entity does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A sensor or switch reading could not be used this tick.
    #[error("reading error")]
    Reading(#[from] ReadingError),

    /// The actuator gateway did not acknowledge a command.
    #[error("actuation failed")]
    Actuation(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The persisted state store failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DryPlugError {
    /// Whether the error only reflects readings that were unusable this
    /// tick, with nothing in the environment or the store being broken.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Reading(_))
    }
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("name {0:?} does not produce a usable identifier")]
    UnsluggableName(String),

    #[error("{field} entity reference must not be empty")]
    EmptyEntityRef { field: &'static str },

    #[error("invalid time of day {0:?}, expected HH:MM:SS")]
    InvalidTimeOfDay(String),

    #[error("{field} must be a finite number")]
    NonFiniteThreshold { field: &'static str },

    #[error("controller {0:?} is already registered")]
    DuplicateController(String),

    #[error("{0:?} is not a controller key")]
    InvalidKey(String),
}

/// Lookup failure for a named resource.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Why a reading could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadingError {
    /// The reference resolved to no state at all.
    #[error("no state for {0}")]
    Missing(String),

    /// The reference resolved to an explicit unavailable/unknown marker.
    #[error("{0} is unavailable")]
    Unavailable(String),
}
