//! Gateway ports: how the engine senses and actuates its environment.

use std::future::Future;
use std::sync::Arc;

use dryplug_domain::entity::{EntityState, NumericState};
use dryplug_domain::error::DryPlugError;

/// Read-only access to the current state of switches and sensors.
pub trait SensorGateway {
    /// Current state of a switch-like entity, or `None` when the reference
    /// resolves to nothing.
    fn read_switch(
        &self,
        entity: &str,
    ) -> impl Future<Output = Result<Option<EntityState>, DryPlugError>> + Send;

    /// Current state of a numeric sensor, or `None` when the reference
    /// resolves to nothing.
    fn read_numeric(
        &self,
        entity: &str,
    ) -> impl Future<Output = Result<Option<NumericState>, DryPlugError>> + Send;
}

/// Write-only access to switches.
pub trait ActuatorGateway {
    /// Turn `entity` on or off, resolving once the command is acknowledged.
    fn set_switch(
        &self,
        entity: &str,
        on: bool,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send;
}

/// Write access to the readings a [`SensorGateway`] reports, for
/// environments fed from outside the process.
pub trait ReadingInput {
    /// Replace the state of an existing switch.
    fn update_switch(
        &self,
        entity: &str,
        state: EntityState,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send;

    /// Replace the reading of an existing numeric sensor.
    fn update_numeric(
        &self,
        entity: &str,
        state: NumericState,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send;
}

impl<T: SensorGateway + Send + Sync> SensorGateway for Arc<T> {
    fn read_switch(
        &self,
        entity: &str,
    ) -> impl Future<Output = Result<Option<EntityState>, DryPlugError>> + Send {
        (**self).read_switch(entity)
    }

    fn read_numeric(
        &self,
        entity: &str,
    ) -> impl Future<Output = Result<Option<NumericState>, DryPlugError>> + Send {
        (**self).read_numeric(entity)
    }
}

impl<T: ActuatorGateway + Send + Sync> ActuatorGateway for Arc<T> {
    fn set_switch(
        &self,
        entity: &str,
        on: bool,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send {
        (**self).set_switch(entity, on)
    }
}

impl<T: ReadingInput + Send + Sync> ReadingInput for Arc<T> {
    fn update_switch(
        &self,
        entity: &str,
        state: EntityState,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send {
        (**self).update_switch(entity, state)
    }

    fn update_numeric(
        &self,
        entity: &str,
        state: NumericState,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send {
        (**self).update_numeric(entity, state)
    }
}
