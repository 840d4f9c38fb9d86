//! Persisted state store port: durable engine state per controller.

use std::future::Future;
use std::sync::Arc;

use dryplug_domain::engine_state::EngineState;
use dryplug_domain::error::DryPlugError;

/// Durable key/value record of each controller's [`EngineState`].
///
/// Keys are the stable storage keys derived from controller names
/// (see [`ControllerKey::storage_key`](dryplug_domain::id::ControllerKey::storage_key)).
pub trait EngineStateStore {
    /// Load the state saved under `key`, or `None` if nothing was saved yet.
    fn load(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<EngineState>, DryPlugError>> + Send;

    /// Replace the state saved under `key` with a full snapshot of `state`.
    fn save(
        &self,
        key: &str,
        state: &EngineState,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send;

    /// Forget the state saved under `key`.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), DryPlugError>> + Send;
}

impl<T: EngineStateStore + Send + Sync> EngineStateStore for Arc<T> {
    fn load(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<EngineState>, DryPlugError>> + Send {
        (**self).load(key)
    }

    fn save(
        &self,
        key: &str,
        state: &EngineState,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send {
        (**self).save(key, state)
    }

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), DryPlugError>> + Send {
        (**self).delete(key)
    }
}
