//! Virtual numeric sensor: holds a value or an unavailable marker.

use std::sync::{Mutex, PoisonError};

use dryplug_domain::entity::NumericState;

/// A simulated sensor whose reading is set from the outside.
#[derive(Debug)]
pub struct VirtualSensor {
    state: Mutex<NumericState>,
}

impl VirtualSensor {
    #[must_use]
    pub fn new(state: NumericState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    #[must_use]
    pub fn state(&self) -> NumericState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, state: NumericState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}
