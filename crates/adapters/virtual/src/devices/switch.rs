//! Virtual switch: holds `on`, `off` or `unavailable`.

use std::sync::{Mutex, PoisonError};

use dryplug_domain::entity::EntityState;

/// A simulated switch that can be turned on and off.
#[derive(Debug)]
pub struct VirtualSwitch {
    state: Mutex<EntityState>,
}

impl VirtualSwitch {
    #[must_use]
    pub fn new(state: EntityState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    #[must_use]
    pub fn state(&self) -> EntityState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, state: EntityState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}
