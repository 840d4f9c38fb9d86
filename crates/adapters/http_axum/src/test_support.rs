//! Stub ports and a supervisor factory shared by the handler tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use dryplug_app::ports::{ActuatorGateway, Clock, EngineStateStore, ReadingInput, SensorGateway};
use dryplug_app::supervisor::ControllerSupervisor;
use dryplug_domain::controller::ControllerConfig;
use dryplug_domain::engine_state::EngineState;
use dryplug_domain::entity::{EntityState, NumericState};
use dryplug_domain::error::{DryPlugError, NotFoundError};

use crate::state::AppState;

#[derive(Default)]
pub struct StubEnvironment {
    pub switches: Mutex<HashMap<String, EntityState>>,
    pub numerics: Mutex<HashMap<String, NumericState>>,
}

impl SensorGateway for StubEnvironment {
    fn read_switch(
        &self,
        entity: &str,
    ) -> impl Future<Output = Result<Option<EntityState>, DryPlugError>> + Send {
        let state = self.switches.lock().unwrap().get(entity).copied();
        async move { Ok(state) }
    }

    fn read_numeric(
        &self,
        entity: &str,
    ) -> impl Future<Output = Result<Option<NumericState>, DryPlugError>> + Send {
        let state = self.numerics.lock().unwrap().get(entity).copied();
        async move { Ok(state) }
    }
}

impl ActuatorGateway for StubEnvironment {
    fn set_switch(
        &self,
        entity: &str,
        on: bool,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send {
        self.switches
            .lock()
            .unwrap()
            .insert(entity.to_string(), EntityState::from_bool(on));
        async { Ok(()) }
    }
}

impl ReadingInput for StubEnvironment {
    fn update_switch(
        &self,
        entity: &str,
        state: EntityState,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send {
        let result = match self.switches.lock().unwrap().get_mut(entity) {
            Some(current) => {
                *current = state;
                Ok(())
            }
            None => Err(not_found("Switch", entity)),
        };
        async move { result }
    }

    fn update_numeric(
        &self,
        entity: &str,
        state: NumericState,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send {
        let result = match self.numerics.lock().unwrap().get_mut(entity) {
            Some(current) => {
                *current = state;
                Ok(())
            }
            None => Err(not_found("Sensor", entity)),
        };
        async move { result }
    }
}

fn not_found(entity: &'static str, id: &str) -> DryPlugError {
    NotFoundError {
        entity,
        id: id.to_string(),
    }
    .into()
}

pub struct StubStore;

impl EngineStateStore for StubStore {
    async fn load(&self, _key: &str) -> Result<Option<EngineState>, DryPlugError> {
        Ok(None)
    }

    async fn save(&self, _key: &str, _state: &EngineState) -> Result<(), DryPlugError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), DryPlugError> {
        Ok(())
    }
}

pub struct StubClock;

impl Clock for StubClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .unwrap()
            .fixed_offset()
    }
}

pub type TestState = AppState<StubEnvironment, StubEnvironment, StubStore, StubClock>;

pub fn cellar_config() -> ControllerConfig {
    ControllerConfig::builder()
        .name("Cellar")
        .switch_entity("switch.cellar_plug")
        .power_sensor("sensor.cellar_plug_power")
        .humidity_sensor("sensor.cellar_humidity")
        .build()
        .unwrap()
}

/// Environment where the cellar controller can tick: switch off, 0 W,
/// 70 % humidity, auto-control on.
pub fn cellar_environment() -> StubEnvironment {
    let env = StubEnvironment::default();
    {
        let mut switches = env.switches.lock().unwrap();
        switches.insert("switch.cellar_plug".to_string(), EntityState::Off);
        switches.insert("switch.cellar_control".to_string(), EntityState::On);
    }
    {
        let mut numerics = env.numerics.lock().unwrap();
        numerics.insert("sensor.cellar_plug_power".to_string(), NumericState::Value(0.0));
        numerics.insert("sensor.cellar_humidity".to_string(), NumericState::Value(70.0));
    }
    env
}

pub fn test_state(env: StubEnvironment) -> (TestState, Arc<StubEnvironment>) {
    let env = Arc::new(env);
    let supervisor = ControllerSupervisor::new(
        Arc::clone(&env),
        Arc::clone(&env),
        Arc::new(StubStore),
        Arc::new(StubClock),
        Duration::from_secs(30),
    );
    (AppState::new(Arc::new(supervisor), Arc::clone(&env)), env)
}
