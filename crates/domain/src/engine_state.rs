//! Engine state: the control engine's fields that must survive restarts.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Mutable, persisted state of one controller.
///
/// Every save writes all fields at once, so a stored record is always a
/// consistent snapshot of the state at some save point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    /// When the engine last turned the switch on by itself.
    pub last_auto_on: Option<Timestamp>,
    /// When power first dropped below the full threshold while the switch was on.
    pub power_low_since: Option<Timestamp>,
    /// The switch was turned on by something other than the engine.
    pub manual_override: bool,
    /// Switch value seen on the previous tick (`None` before the first tick).
    pub last_switch_state: Option<bool>,
    /// Low power has persisted for the full debounce duration.
    pub is_full_latched: bool,
    /// The previous tick commanded ON itself; the next off→on transition is
    /// not a manual action.
    pub auto_turning_on: bool,
}

impl EngineState {
    /// Whether the state carries no information yet.
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    #[test]
    fn should_start_pristine() {
        let state = EngineState::default();
        assert!(state.is_pristine());
        assert!(state.last_auto_on.is_none());
        assert!(state.last_switch_state.is_none());
        assert!(!state.manual_override);
        assert!(!state.is_full_latched);
    }

    #[test]
    fn should_not_be_pristine_once_a_field_is_set() {
        let state = EngineState {
            last_switch_state: Some(false),
            ..EngineState::default()
        };
        assert!(!state.is_pristine());
    }

    #[test]
    fn should_keep_absent_timestamps_absent_through_serde() {
        let state = EngineState {
            power_low_since: Some(now()),
            manual_override: true,
            ..EngineState::default()
        };
        let json = serde_json::to_string(&state).unwrap();
        let parsed: EngineState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
        assert!(parsed.last_auto_on.is_none());
    }
}
