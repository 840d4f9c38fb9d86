//! Virtual power meter: reports the load of the switch it is plugged into.

use std::sync::{Mutex, PoisonError};

use dryplug_domain::entity::{EntityState, NumericState};

/// A simulated power meter attached to a switch.
///
/// The meter reports its load while the switch is on and `0` while it is off.
/// Dropping the load below the full threshold simulates a dehumidifier that
/// stopped because its tank is full.
#[derive(Debug)]
pub struct VirtualMeter {
    switch_entity: String,
    load: Mutex<NumericState>,
}

impl VirtualMeter {
    #[must_use]
    pub fn new(switch_entity: impl Into<String>, load_watts: f64) -> Self {
        Self {
            switch_entity: switch_entity.into(),
            load: Mutex::new(NumericState::Value(load_watts)),
        }
    }

    /// Reference of the switch this meter is attached to.
    #[must_use]
    pub fn switch_entity(&self) -> &str {
        &self.switch_entity
    }

    /// Replace the drawn load, or mark the meter unavailable.
    pub fn set_load(&self, load: NumericState) {
        *self.load.lock().unwrap_or_else(PoisonError::into_inner) = load;
    }

    /// Current reading given the state of the attached switch.
    #[must_use]
    pub fn reading(&self, switch: EntityState) -> NumericState {
        let load = *self.load.lock().unwrap_or_else(PoisonError::into_inner);
        match (load, switch) {
            (NumericState::Value(watts), EntityState::On) => NumericState::Value(watts),
            (NumericState::Value(_), EntityState::Off) => NumericState::Value(0.0),
            (NumericState::Value(_), _) => NumericState::Unavailable,
            (other, _) => other,
        }
    }
}
