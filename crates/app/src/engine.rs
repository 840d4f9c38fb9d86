//! Control engine: one polling tick per call, fusing switch, power and
//! humidity readings into a single actuation decision.
//!
//! Each tick is evaluated in a fixed order:
//!
//! 1. read every input; a missing or unavailable switch/power/humidity
//!    reading aborts the tick before anything is mutated or actuated
//! 2. detect manual override from switch transitions
//! 3. track the low-power debounce and the "tank full" latch
//! 4. decide whether to turn the switch on or off (only when auto-control is on)
//!
//! Every change to the [`EngineState`] is written through to the store
//! before the tick moves on. A failed save is logged and the in-memory state
//! stays authoritative for the rest of the process lifetime.

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use tracing::{debug, info, warn};

use dryplug_domain::controller::ControllerConfig;
use dryplug_domain::engine_state::EngineState;
use dryplug_domain::entity::EntityState;
use dryplug_domain::error::{DryPlugError, ReadingError};
use dryplug_domain::snapshot::TickSnapshot;
use dryplug_domain::time::Timestamp;

use crate::ports::{ActuatorGateway, EngineStateStore, SensorGateway};

/// Seconds power must stay below the full threshold before the tank counts as full.
pub const FULL_DEBOUNCE_SECS: i64 = 60;

/// Inputs of one tick, all known to be usable.
#[derive(Debug, Clone, Copy)]
struct Readings {
    is_on: bool,
    power: f64,
    humidity: f64,
    auto_enabled: bool,
}

/// Evaluation context shared by the decision branches.
#[derive(Debug, Clone, Copy)]
struct Conditions {
    is_on: bool,
    is_full: bool,
    inside_schedule: bool,
    humidity_low: bool,
    humidity_high: bool,
}

/// Polling state machine for one controlled outlet.
pub struct ControlEngine<S, A, St> {
    config: ControllerConfig,
    auto_control_entity: String,
    storage_key: String,
    state: EngineState,
    sensors: S,
    actuator: A,
    store: St,
}

impl<S, A, St> ControlEngine<S, A, St>
where
    S: SensorGateway,
    A: ActuatorGateway,
    St: EngineStateStore,
{
    /// Create an engine with pristine state. Call [`hydrate`](Self::hydrate)
    /// before the first tick to restore what was persisted.
    pub fn new(config: ControllerConfig, sensors: S, actuator: A, store: St) -> Self {
        Self {
            auto_control_entity: config.auto_control_entity(),
            storage_key: config.key.storage_key(),
            config,
            state: EngineState::default(),
            sensors,
            actuator,
            store,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Restore the persisted state.
    ///
    /// A load failure is not fatal: the engine carries on with default state.
    pub async fn hydrate(&mut self) {
        match self.store.load(&self.storage_key).await {
            Ok(Some(state)) => {
                debug!(controller = %self.config.key, ?state, "restored engine state");
                self.state = state;
            }
            Ok(None) => {
                debug!(controller = %self.config.key, "no persisted engine state, starting fresh");
                self.state = EngineState::default();
            }
            Err(err) => {
                warn!(
                    controller = %self.config.key,
                    error = ?err,
                    "failed to load engine state, starting from defaults"
                );
                self.state = EngineState::default();
            }
        }
    }

    /// Run one evaluation at wall-clock time `now`.
    ///
    /// The schedule is checked against the time of day of `now` in its own
    /// offset.
    ///
    /// # Errors
    ///
    /// - [`DryPlugError::Reading`] when the switch, power or humidity reading
    ///   is missing or unavailable; nothing was mutated or actuated.
    /// - [`DryPlugError::Actuation`] when a switch command was not
    ///   acknowledged; state persisted earlier in the tick is kept.
    /// - Any error raised by the sensor gateway itself.
    pub async fn tick(&mut self, now: DateTime<FixedOffset>) -> Result<TickSnapshot, DryPlugError> {
        let readings = self.read().await?;
        let instant = now.with_timezone(&Utc);

        let inside_schedule = self.config.schedule.contains(now.time());
        let humidity_low = readings.humidity < self.config.humidity_off_threshold;
        let humidity_high = readings.humidity > self.config.humidity_on_threshold;

        self.detect_override(readings.is_on).await;
        let is_full = self
            .track_fullness(readings.is_on, readings.power, instant)
            .await;

        let conditions = Conditions {
            is_on: readings.is_on,
            is_full,
            inside_schedule,
            humidity_low,
            humidity_high,
        };

        debug!(
            controller = %self.config.key,
            auto_enabled = readings.auto_enabled,
            inside_schedule,
            is_on = readings.is_on,
            humidity_low,
            humidity_high,
            is_full,
            manual_override = self.state.manual_override,
            power = readings.power,
            humidity = readings.humidity,
            "evaluated conditions"
        );

        if readings.auto_enabled {
            self.decide(conditions, instant).await?;
        }

        Ok(TickSnapshot {
            is_on: readings.is_on,
            is_full,
            inside_schedule,
            humidity_low,
            humidity_high,
            manual_override: self.state.manual_override,
            evaluated_at: instant,
        })
    }

    async fn read(&self) -> Result<Readings, DryPlugError> {
        let switch = self
            .sensors
            .read_switch(&self.config.switch_entity)
            .await?
            .ok_or_else(|| ReadingError::Missing(self.config.switch_entity.clone()))?;
        let power = self
            .sensors
            .read_numeric(&self.config.power_sensor)
            .await?
            .ok_or_else(|| ReadingError::Missing(self.config.power_sensor.clone()))?;
        let humidity = self
            .sensors
            .read_numeric(&self.config.humidity_sensor)
            .await?
            .ok_or_else(|| ReadingError::Missing(self.config.humidity_sensor.clone()))?;

        let is_on = switch
            .as_bool()
            .ok_or_else(|| ReadingError::Unavailable(self.config.switch_entity.clone()))?;
        let power = power
            .value()
            .ok_or_else(|| ReadingError::Unavailable(self.config.power_sensor.clone()))?;
        let humidity = humidity
            .value()
            .ok_or_else(|| ReadingError::Unavailable(self.config.humidity_sensor.clone()))?;

        // Absent or unavailable counts as off: automatic control is opt-in.
        let auto_enabled = matches!(
            self.sensors.read_switch(&self.auto_control_entity).await?,
            Some(EntityState::On)
        );

        Ok(Readings {
            is_on,
            power,
            humidity,
            auto_enabled,
        })
    }

    /// Classify switch transitions since the previous tick.
    async fn detect_override(&mut self, is_on: bool) {
        let mut changed = false;

        match self.state.last_switch_state {
            Some(false) if is_on => {
                if self.state.auto_turning_on {
                    debug!(controller = %self.config.key, "switch turned on by the engine");
                } else if !self.state.manual_override {
                    info!(controller = %self.config.key, "switch turned on externally, manual override");
                    self.state.manual_override = true;
                    changed = true;
                }
            }
            Some(true) if !is_on => {
                if self.state.manual_override {
                    info!(controller = %self.config.key, "switch turned off, manual override cleared");
                    self.state.manual_override = false;
                    changed = true;
                }
            }
            _ => {}
        }

        if self.state.auto_turning_on {
            self.state.auto_turning_on = false;
            changed = true;
        }
        if self.state.last_switch_state != Some(is_on) {
            self.state.last_switch_state = Some(is_on);
            changed = true;
        }

        if changed {
            self.persist().await;
        }
    }

    /// Debounce low power draw into the latched "full" condition and return
    /// whether the tank counts as full this tick.
    async fn track_fullness(&mut self, is_on: bool, power: f64, now: Timestamp) -> bool {
        let mut changed = false;

        if is_on && power < self.config.full_power_threshold {
            if self.state.power_low_since.is_none() {
                debug!(controller = %self.config.key, power, "power dropped below full threshold");
                self.state.power_low_since = Some(now);
                changed = true;
            }
        } else {
            if self.state.power_low_since.take().is_some() {
                changed = true;
            }
            if self.state.is_full_latched {
                info!(controller = %self.config.key, "power recovered, no longer full");
                self.state.is_full_latched = false;
                changed = true;
            }
        }

        let mut is_full = self.state.is_full_latched;
        if let Some(since) = self.state.power_low_since
            && now - since >= TimeDelta::seconds(FULL_DEBOUNCE_SECS)
        {
            is_full = true;
            if !self.state.is_full_latched {
                info!(controller = %self.config.key, %since, "tank full");
                self.state.is_full_latched = true;
                changed = true;
            }
        }

        if changed {
            self.persist().await;
        }
        is_full
    }

    async fn decide(&mut self, c: Conditions, now: Timestamp) -> Result<(), DryPlugError> {
        if c.inside_schedule {
            if c.humidity_high && !c.is_full && !c.is_on {
                info!(controller = %self.config.key, "humidity above threshold, turning on");
                self.actuate(true).await?;
                self.state.last_auto_on = Some(now);
                self.state.manual_override = false;
                self.state.auto_turning_on = true;
                self.persist().await;
            } else if c.humidity_low && c.is_on {
                info!(controller = %self.config.key, "humidity below threshold, turning off");
                self.turn_off().await?;
            }
        } else if c.is_on {
            if c.humidity_low {
                info!(controller = %self.config.key, "outside schedule and humidity low, turning off");
                self.turn_off().await?;
            } else if self.state.manual_override {
                debug!(controller = %self.config.key, "outside schedule, manually turned on, leaving on");
            } else if c.is_full {
                debug!(controller = %self.config.key, "outside schedule and full, leaving as is");
            } else {
                info!(controller = %self.config.key, "outside schedule, turning off");
                self.turn_off().await?;
            }
        }
        Ok(())
    }

    async fn turn_off(&mut self) -> Result<(), DryPlugError> {
        self.actuate(false).await?;
        if self.state.manual_override {
            self.state.manual_override = false;
            self.persist().await;
        }
        Ok(())
    }

    async fn actuate(&self, on: bool) -> Result<(), DryPlugError> {
        self.actuator
            .set_switch(&self.config.switch_entity, on)
            .await
            .inspect_err(|err| {
                tracing::error!(
                    controller = %self.config.key,
                    on,
                    error = ?err,
                    "switch command failed"
                );
            })
    }

    async fn persist(&self) {
        if let Err(err) = self.store.save(&self.storage_key, &self.state).await {
            warn!(
                controller = %self.config.key,
                error = ?err,
                "failed to persist engine state, keeping it in memory only"
            );
        }
    }
}
