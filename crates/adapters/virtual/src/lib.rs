//! # dryplug-adapter-virtual
//!
//! Virtual environment that simulates the devices a controller drives, for
//! testing and demonstration purposes.
//!
//! ## Provided devices (per registered controller)
//!
//! | Device | Reference | Behaviour |
//! |--------|-----------|-----------|
//! | Plug | `switch_entity` | Starts off, follows `set_switch` commands |
//! | Power meter | `power_sensor` | Reports the configured load while the plug is on, `0` otherwise |
//! | Humidity sensor | `humidity_sensor` | Holds a value set from the outside |
//! | Auto-control toggle | `switch.<name>_control` | Starts on |
//!
//! ## Dependency rule
//!
//! Depends on `dryplug-app` (port traits) and `dryplug-domain` only.

mod devices;

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dryplug_app::ports::{ActuatorGateway, ReadingInput, SensorGateway};
use dryplug_domain::controller::ControllerConfig;
use dryplug_domain::entity::{EntityState, NumericState};
use dryplug_domain::error::{DryPlugError, NotFoundError};

use devices::{VirtualDevice, VirtualMeter, VirtualSensor, VirtualSwitch};

/// Watts drawn by a running virtual dehumidifier.
pub const DEFAULT_LOAD_WATTS: f64 = 180.0;
/// Relative humidity reported by a freshly registered sensor.
pub const DEFAULT_HUMIDITY: f64 = 55.0;

/// Errors produced by the virtual actuator.
#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    #[error("command for {0} rejected")]
    Rejected(String),
}

/// In-memory environment implementing both gateways.
pub struct VirtualEnvironment {
    devices: RwLock<HashMap<String, VirtualDevice>>,
    load_watts: f64,
    humidity: f64,
    fail_actuation: AtomicBool,
}

impl Default for VirtualEnvironment {
    fn default() -> Self {
        Self::new(DEFAULT_LOAD_WATTS, DEFAULT_HUMIDITY)
    }
}

impl VirtualEnvironment {
    /// Create an empty environment. Controllers registered later draw
    /// `load_watts` while on and start at `humidity` percent.
    #[must_use]
    pub fn new(load_watts: f64, humidity: f64) -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
            load_watts,
            humidity,
            fail_actuation: AtomicBool::new(false),
        }
    }

    /// Create the plug, meter, humidity sensor and auto-control toggle of a
    /// controller. References that already exist are left untouched, so
    /// controllers may share a humidity sensor.
    pub fn register_controller(&self, config: &ControllerConfig) {
        let mut devices = self.write();
        devices
            .entry(config.switch_entity.clone())
            .or_insert_with(|| VirtualDevice::Switch(VirtualSwitch::new(EntityState::Off)));
        devices
            .entry(config.power_sensor.clone())
            .or_insert_with(|| {
                VirtualDevice::Meter(VirtualMeter::new(&config.switch_entity, self.load_watts))
            });
        devices
            .entry(config.humidity_sensor.clone())
            .or_insert_with(|| {
                VirtualDevice::Sensor(VirtualSensor::new(NumericState::Value(self.humidity)))
            });
        devices
            .entry(config.auto_control_entity())
            .or_insert_with(|| VirtualDevice::Switch(VirtualSwitch::new(EntityState::On)));
        tracing::debug!(controller = %config.key, "virtual devices registered");
    }

    /// Set a switch state, creating the switch if it does not exist.
    pub fn set_switch_state(&self, entity: &str, state: EntityState) {
        let mut devices = self.write();
        match devices.get(entity) {
            Some(VirtualDevice::Switch(switch)) => switch.set(state),
            _ => {
                devices.insert(
                    entity.to_string(),
                    VirtualDevice::Switch(VirtualSwitch::new(state)),
                );
            }
        }
    }

    /// Set a sensor reading. On a power meter this replaces the drawn load.
    pub fn set_numeric(&self, entity: &str, state: NumericState) {
        let mut devices = self.write();
        match devices.get(entity) {
            Some(VirtualDevice::Sensor(sensor)) => sensor.set(state),
            Some(VirtualDevice::Meter(meter)) => meter.set_load(state),
            _ => {
                devices.insert(
                    entity.to_string(),
                    VirtualDevice::Sensor(VirtualSensor::new(state)),
                );
            }
        }
    }

    /// Forget a reference; it reads as missing afterwards.
    pub fn remove(&self, entity: &str) {
        self.write().remove(entity);
    }

    /// Make every following `set_switch` fail until reset.
    pub fn set_fail_actuation(&self, fail: bool) {
        self.fail_actuation.store(fail, Ordering::SeqCst);
    }

    fn switch_state(devices: &HashMap<String, VirtualDevice>, entity: &str) -> Option<EntityState> {
        match devices.get(entity) {
            Some(VirtualDevice::Switch(switch)) => Some(switch.state()),
            _ => None,
        }
    }

    fn numeric_state(
        devices: &HashMap<String, VirtualDevice>,
        entity: &str,
    ) -> Option<NumericState> {
        match devices.get(entity)? {
            VirtualDevice::Sensor(sensor) => Some(sensor.state()),
            VirtualDevice::Meter(meter) => {
                let switch = Self::switch_state(devices, meter.switch_entity())
                    .unwrap_or(EntityState::Unavailable);
                Some(meter.reading(switch))
            }
            VirtualDevice::Switch(_) => None,
        }
    }

    fn actuate(&self, entity: &str, on: bool) -> Result<(), DryPlugError> {
        if self.fail_actuation.load(Ordering::SeqCst) {
            return Err(DryPlugError::Actuation(Box::new(VirtualError::Rejected(
                entity.to_string(),
            ))));
        }
        let devices = self.read();
        let Some(VirtualDevice::Switch(switch)) = devices.get(entity) else {
            return Err(NotFoundError {
                entity: "Switch",
                id: entity.to_string(),
            }
            .into());
        };
        switch.set(EntityState::from_bool(on));
        tracing::debug!(entity, on, "virtual switch set");
        Ok(())
    }

    fn feed_switch(&self, entity: &str, state: EntityState) -> Result<(), DryPlugError> {
        let devices = self.read();
        let Some(VirtualDevice::Switch(switch)) = devices.get(entity) else {
            return Err(NotFoundError {
                entity: "Switch",
                id: entity.to_string(),
            }
            .into());
        };
        switch.set(state);
        tracing::debug!(entity, %state, "virtual switch updated");
        Ok(())
    }

    fn feed_numeric(&self, entity: &str, state: NumericState) -> Result<(), DryPlugError> {
        let devices = self.read();
        match devices.get(entity) {
            Some(VirtualDevice::Sensor(sensor)) => sensor.set(state),
            Some(VirtualDevice::Meter(meter)) => meter.set_load(state),
            _ => {
                return Err(NotFoundError {
                    entity: "Sensor",
                    id: entity.to_string(),
                }
                .into());
            }
        }
        tracing::debug!(entity, %state, "virtual sensor updated");
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, VirtualDevice>> {
        self.devices.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, VirtualDevice>> {
        self.devices.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SensorGateway for VirtualEnvironment {
    fn read_switch(
        &self,
        entity: &str,
    ) -> impl Future<Output = Result<Option<EntityState>, DryPlugError>> + Send {
        let state = Self::switch_state(&self.read(), entity);
        async move { Ok(state) }
    }

    fn read_numeric(
        &self,
        entity: &str,
    ) -> impl Future<Output = Result<Option<NumericState>, DryPlugError>> + Send {
        let state = Self::numeric_state(&self.read(), entity);
        async move { Ok(state) }
    }
}

impl ActuatorGateway for VirtualEnvironment {
    fn set_switch(
        &self,
        entity: &str,
        on: bool,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send {
        let result = self.actuate(entity, on);
        async move { result }
    }
}

impl ReadingInput for VirtualEnvironment {
    fn update_switch(
        &self,
        entity: &str,
        state: EntityState,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send {
        let result = self.feed_switch(entity, state);
        async move { result }
    }

    fn update_numeric(
        &self,
        entity: &str,
        state: NumericState,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send {
        let result = self.feed_numeric(entity, state);
        async move { result }
    }
}
