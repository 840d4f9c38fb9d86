//! Shared application state for axum handlers.

use std::sync::Arc;

use dryplug_app::supervisor::ControllerSupervisor;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the port types themselves do not need
/// to be `Clone`; only the `Arc`s are cloned.
pub struct AppState<S, A, St, C> {
    pub supervisor: Arc<ControllerSupervisor<S, A, St, C>>,
    /// The environment the supervised engines read, fed through
    /// `PUT /api/switches/{entity}` and `PUT /api/sensors/{entity}`.
    pub sensors: Arc<S>,
}

impl<S, A, St, C> Clone for AppState<S, A, St, C> {
    fn clone(&self) -> Self {
        Self {
            supervisor: Arc::clone(&self.supervisor),
            sensors: Arc::clone(&self.sensors),
        }
    }
}

impl<S, A, St, C> AppState<S, A, St, C> {
    /// Create the state from a supervisor that is also driven elsewhere
    /// (spawning controllers, shutdown) and the sensor side it reads.
    pub fn new(supervisor: Arc<ControllerSupervisor<S, A, St, C>>, sensors: Arc<S>) -> Self {
        Self {
            supervisor,
            sensors,
        }
    }
}
