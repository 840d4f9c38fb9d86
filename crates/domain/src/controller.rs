//! Controller configuration: the immutable parameters of one controlled outlet.

use serde::Serialize;

use crate::error::{DryPlugError, ValidationError};
use crate::id::{ControllerKey, slugify};
use crate::schedule::ScheduleWindow;
use crate::time::parse_time_of_day;

/// Watts: a running dehumidifier drawing less than this is considered full.
pub const DEFAULT_FULL_POWER_THRESHOLD: f64 = 2.0;
/// Percent: start dehumidifying above this.
pub const DEFAULT_HUMIDITY_ON_THRESHOLD: f64 = 60.0;
/// Percent: stop dehumidifying below this.
pub const DEFAULT_HUMIDITY_OFF_THRESHOLD: f64 = 50.0;
pub const DEFAULT_START_TIME: &str = "09:00:00";
pub const DEFAULT_END_TIME: &str = "20:00:00";

/// Parameters for one controlled device.
///
/// The humidity thresholds are independent: hysteresis only exists when
/// `humidity_off_threshold < humidity_on_threshold`, and no ordering is
/// enforced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerConfig {
    pub key: ControllerKey,
    pub name: String,
    pub switch_entity: String,
    pub power_sensor: String,
    pub humidity_sensor: String,
    pub full_power_threshold: f64,
    pub humidity_on_threshold: f64,
    pub humidity_off_threshold: f64,
    pub schedule: ScheduleWindow,
}

impl ControllerConfig {
    /// Create a builder for constructing a [`ControllerConfig`].
    #[must_use]
    pub fn builder() -> ControllerConfigBuilder {
        ControllerConfigBuilder::default()
    }

    /// Reference of the companion auto-control toggle for this controller.
    #[must_use]
    pub fn auto_control_entity(&self) -> String {
        format!("switch.{}", slugify(&format!("{}_control", self.name)))
    }
}

/// User-editable overrides applied on top of the base configuration.
///
/// Only the humidity thresholds and the schedule can be changed after the
/// controller has been set up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerOptions {
    pub humidity_on_threshold: Option<f64>,
    pub humidity_off_threshold: Option<f64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Step-by-step builder for [`ControllerConfig`].
#[derive(Debug, Default)]
pub struct ControllerConfigBuilder {
    name: Option<String>,
    switch_entity: Option<String>,
    power_sensor: Option<String>,
    humidity_sensor: Option<String>,
    full_power_threshold: Option<f64>,
    humidity_on_threshold: Option<f64>,
    humidity_off_threshold: Option<f64>,
    start_time: Option<String>,
    end_time: Option<String>,
    options: ControllerOptions,
}

impl ControllerConfigBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn switch_entity(mut self, entity: impl Into<String>) -> Self {
        self.switch_entity = Some(entity.into());
        self
    }

    #[must_use]
    pub fn power_sensor(mut self, entity: impl Into<String>) -> Self {
        self.power_sensor = Some(entity.into());
        self
    }

    #[must_use]
    pub fn humidity_sensor(mut self, entity: impl Into<String>) -> Self {
        self.humidity_sensor = Some(entity.into());
        self
    }

    #[must_use]
    pub fn full_power_threshold(mut self, watts: f64) -> Self {
        self.full_power_threshold = Some(watts);
        self
    }

    #[must_use]
    pub fn humidity_on_threshold(mut self, percent: f64) -> Self {
        self.humidity_on_threshold = Some(percent);
        self
    }

    #[must_use]
    pub fn humidity_off_threshold(mut self, percent: f64) -> Self {
        self.humidity_off_threshold = Some(percent);
        self
    }

    #[must_use]
    pub fn start_time(mut self, time: impl Into<String>) -> Self {
        self.start_time = Some(time.into());
        self
    }

    #[must_use]
    pub fn end_time(mut self, time: impl Into<String>) -> Self {
        self.end_time = Some(time.into());
        self
    }

    /// Apply user options; they take precedence over the base values.
    #[must_use]
    pub fn options(mut self, options: ControllerOptions) -> Self {
        self.options = options;
        self
    }

    /// Consume the builder, validate, and return a [`ControllerConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`DryPlugError::Validation`] when the name or an entity
    /// reference is empty, a threshold is not finite, or a schedule bound is
    /// not a valid `HH:MM:SS` time.
    pub fn build(self) -> Result<ControllerConfig, DryPlugError> {
        let name = self.name.unwrap_or_default();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let key = ControllerKey::from_name(&name)?;

        let switch_entity = required_ref("switch_entity", self.switch_entity)?;
        let power_sensor = required_ref("power_sensor", self.power_sensor)?;
        let humidity_sensor = required_ref("humidity_sensor", self.humidity_sensor)?;

        let opts = self.options;
        let full_power_threshold = finite(
            "full_power_threshold",
            self.full_power_threshold
                .unwrap_or(DEFAULT_FULL_POWER_THRESHOLD),
        )?;
        let humidity_on_threshold = finite(
            "humidity_on_threshold",
            opts.humidity_on_threshold
                .or(self.humidity_on_threshold)
                .unwrap_or(DEFAULT_HUMIDITY_ON_THRESHOLD),
        )?;
        let humidity_off_threshold = finite(
            "humidity_off_threshold",
            opts.humidity_off_threshold
                .or(self.humidity_off_threshold)
                .unwrap_or(DEFAULT_HUMIDITY_OFF_THRESHOLD),
        )?;

        let start = opts
            .start_time
            .or(self.start_time)
            .unwrap_or_else(|| DEFAULT_START_TIME.to_string());
        let end = opts
            .end_time
            .or(self.end_time)
            .unwrap_or_else(|| DEFAULT_END_TIME.to_string());
        let schedule = ScheduleWindow::new(parse_time_of_day(&start)?, parse_time_of_day(&end)?);

        Ok(ControllerConfig {
            key,
            name,
            switch_entity,
            power_sensor,
            humidity_sensor,
            full_power_threshold,
            humidity_on_threshold,
            humidity_off_threshold,
            schedule,
        })
    }
}

fn required_ref(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::EmptyEntityRef { field }),
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonFiniteThreshold { field })
    }
}
