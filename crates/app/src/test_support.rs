//! In-memory port fakes shared by the engine and supervisor tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use dryplug_domain::controller::ControllerConfig;
use dryplug_domain::engine_state::EngineState;
use dryplug_domain::entity::{EntityState, NumericState};
use dryplug_domain::error::DryPlugError;

use crate::ports::{ActuatorGateway, Clock, EngineStateStore, SensorGateway};

// ── Environment (both gateways) ───────────────────────────────────

#[derive(Default)]
pub struct FakeEnvironment {
    pub switches: Mutex<HashMap<String, EntityState>>,
    pub numerics: Mutex<HashMap<String, NumericState>>,
    pub commands: Mutex<Vec<(String, bool)>>,
    pub fail_actuation: Mutex<bool>,
}

impl FakeEnvironment {
    pub fn set_switch_state(&self, entity: &str, state: EntityState) {
        self.switches
            .lock()
            .unwrap()
            .insert(entity.to_string(), state);
    }

    pub fn set_numeric(&self, entity: &str, state: NumericState) {
        self.numerics
            .lock()
            .unwrap()
            .insert(entity.to_string(), state);
    }

    pub fn remove(&self, entity: &str) {
        self.switches.lock().unwrap().remove(entity);
        self.numerics.lock().unwrap().remove(entity);
    }

    pub fn commands(&self) -> Vec<(String, bool)> {
        self.commands.lock().unwrap().clone()
    }

    pub fn clear_commands(&self) {
        self.commands.lock().unwrap().clear();
    }
}

impl SensorGateway for FakeEnvironment {
    fn read_switch(
        &self,
        entity: &str,
    ) -> impl Future<Output = Result<Option<EntityState>, DryPlugError>> + Send {
        let r = self.switches.lock().unwrap().get(entity).copied();
        async move { Ok(r) }
    }

    fn read_numeric(
        &self,
        entity: &str,
    ) -> impl Future<Output = Result<Option<NumericState>, DryPlugError>> + Send {
        let r = self.numerics.lock().unwrap().get(entity).copied();
        async move { Ok(r) }
    }
}

impl ActuatorGateway for FakeEnvironment {
    fn set_switch(
        &self,
        entity: &str,
        on: bool,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send {
        let result = if *self.fail_actuation.lock().unwrap() {
            Err(DryPlugError::Actuation(Box::new(std::io::Error::other(
                "no acknowledgement",
            ))))
        } else {
            self.commands
                .lock()
                .unwrap()
                .push((entity.to_string(), on));
            self.set_switch_state(entity, EntityState::from_bool(on));
            Ok(())
        };
        async move { result }
    }
}

// ── State store ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStore {
    pub records: Mutex<HashMap<String, EngineState>>,
    pub saves: Mutex<usize>,
    pub fail_load: Mutex<bool>,
    pub fail_save: Mutex<bool>,
}

impl MemoryStore {
    pub fn record(&self, key: &str) -> Option<EngineState> {
        self.records.lock().unwrap().get(key).cloned()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

fn io_failure() -> DryPlugError {
    DryPlugError::Storage(Box::new(std::io::Error::other("store offline")))
}

impl EngineStateStore for MemoryStore {
    fn load(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<EngineState>, DryPlugError>> + Send {
        let result = if *self.fail_load.lock().unwrap() {
            Err(io_failure())
        } else {
            Ok(self.record(key))
        };
        async move { result }
    }

    fn save(
        &self,
        key: &str,
        state: &EngineState,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send {
        let result = if *self.fail_save.lock().unwrap() {
            Err(io_failure())
        } else {
            *self.saves.lock().unwrap() += 1;
            self.records
                .lock()
                .unwrap()
                .insert(key.to_string(), state.clone());
            Ok(())
        };
        async move { result }
    }

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), DryPlugError>> + Send {
        self.records.lock().unwrap().remove(key);
        async { Ok(()) }
    }
}

// ── Clock ─────────────────────────────────────────────────────────

pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

// ── Helpers ───────────────────────────────────────────────────────

pub const SWITCH: &str = "switch.cellar_plug";
pub const POWER: &str = "sensor.cellar_plug_power";
pub const HUMIDITY: &str = "sensor.cellar_humidity";
pub const AUTO: &str = "switch.cellar_control";

/// Default thresholds (on 60 %, off 50 %, full 2 W), schedule 09:00–20:00.
pub fn cellar_config() -> ControllerConfig {
    ControllerConfig::builder()
        .name("Cellar")
        .switch_entity(SWITCH)
        .power_sensor(POWER)
        .humidity_sensor(HUMIDITY)
        .build()
        .unwrap()
}

/// An environment with the switch off, 0 W, 55 % and auto-control on.
pub fn cellar_environment() -> FakeEnvironment {
    let env = FakeEnvironment::default();
    env.set_switch_state(SWITCH, EntityState::Off);
    env.set_numeric(POWER, NumericState::Value(0.0));
    env.set_numeric(HUMIDITY, NumericState::Value(55.0));
    env.set_switch_state(AUTO, EntityState::On);
    env
}

/// 2024-03-01 at the given UTC wall-clock time.
pub fn at(hour: u32, min: u32, sec: u32) -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, min, sec)
        .unwrap()
        .fixed_offset()
}
