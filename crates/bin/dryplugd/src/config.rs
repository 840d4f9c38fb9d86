//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `dryplug.toml` in the working directory (or the path in
//! `DRYPLUG_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use dryplug_app::supervisor::DEFAULT_POLL_INTERVAL;
use dryplug_domain::controller::{ControllerConfig, ControllerOptions};
use dryplug_domain::error::DryPlugError;

const DEFAULT_PATH: &str = "dryplug.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Control loop settings.
    pub engine: EngineConfig,
    /// Controlled devices.
    pub controllers: Vec<ControllerEntry>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Control loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds between two ticks of the same controller.
    pub poll_interval_secs: u64,
}

/// One `[[controllers]]` table.
#[derive(Debug, Deserialize)]
pub struct ControllerEntry {
    pub name: String,
    pub switch_entity: String,
    pub power_sensor: String,
    pub humidity_sensor: String,
    pub full_power_threshold: Option<f64>,
    pub humidity_on_threshold: Option<f64>,
    pub humidity_off_threshold: Option<f64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    /// User overrides, applied on top of the values above.
    #[serde(default)]
    pub options: OptionsEntry,
}

/// The `options` table of a controller.
#[derive(Debug, Default, Deserialize)]
pub struct OptionsEntry {
    pub humidity_on_threshold: Option<f64>,
    pub humidity_off_threshold: Option<f64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl Config {
    /// Load configuration from `dryplug.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if a
    /// value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("DRYPLUG_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("DRYPLUG_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("DRYPLUG_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("DRYPLUG_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("DRYPLUG_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("DRYPLUG_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.engine.poll_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "poll_interval_secs must be non-zero".to_string(),
            ));
        }
        self.controller_configs().map(|_| ())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Period between two ticks of the same controller.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.engine.poll_interval_secs)
    }

    /// Build and validate every configured controller.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Controller`] for the first invalid entry, and
    /// for any entry whose name maps to the key of an earlier one.
    pub fn controller_configs(&self) -> Result<Vec<ControllerConfig>, ConfigError> {
        let mut seen = HashSet::new();
        let mut configs = Vec::with_capacity(self.controllers.len());
        for entry in &self.controllers {
            let config = entry.build().map_err(|source| ConfigError::Controller {
                name: entry.name.clone(),
                source,
            })?;
            if !seen.insert(config.key.clone()) {
                return Err(ConfigError::Controller {
                    name: entry.name.clone(),
                    source: dryplug_domain::error::ValidationError::DuplicateController(
                        config.key.to_string(),
                    )
                    .into(),
                });
            }
            configs.push(config);
        }
        Ok(configs)
    }
}

impl ControllerEntry {
    fn build(&self) -> Result<ControllerConfig, DryPlugError> {
        let mut builder = ControllerConfig::builder()
            .name(&self.name)
            .switch_entity(&self.switch_entity)
            .power_sensor(&self.power_sensor)
            .humidity_sensor(&self.humidity_sensor)
            .options(ControllerOptions {
                humidity_on_threshold: self.options.humidity_on_threshold,
                humidity_off_threshold: self.options.humidity_off_threshold,
                start_time: self.options.start_time.clone(),
                end_time: self.options.end_time.clone(),
            });
        if let Some(watts) = self.full_power_threshold {
            builder = builder.full_power_threshold(watts);
        }
        if let Some(percent) = self.humidity_on_threshold {
            builder = builder.humidity_on_threshold(percent);
        }
        if let Some(percent) = self.humidity_off_threshold {
            builder = builder.humidity_off_threshold(percent);
        }
        if let Some(time) = &self.start_time {
            builder = builder.start_time(time);
        }
        if let Some(time) = &self.end_time {
            builder = builder.end_time(time);
        }
        builder.build()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:dryplug.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "dryplugd=info,dryplug=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
    /// A `[[controllers]]` entry is invalid.
    #[error("invalid controller {name:?}")]
    Controller {
        name: String,
        #[source]
        source: DryPlugError,
    },
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::NaiveTime;
    use dryplug_domain::error::ValidationError;

    use super::*;

    const CELLAR: &str = "
        [[controllers]]
        name = 'Cellar'
        switch_entity = 'switch.cellar_plug'
        power_sensor = 'sensor.cellar_plug_power'
        humidity_sensor = 'sensor.cellar_humidity'
    ";

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:dryplug.db?mode=rwc");
        assert_eq!(config.poll_interval(), DEFAULT_POLL_INTERVAL);
        assert!(config.controllers.is_empty());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.poll_interval(), DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [engine]
            poll_interval_secs = 10

            [[controllers]]
            name = 'Cellar'
            switch_entity = 'switch.cellar_plug'
            power_sensor = 'sensor.cellar_plug_power'
            humidity_sensor = 'sensor.cellar_humidity'
            full_power_threshold = 5.0
            humidity_on_threshold = 65.0
            start_time = '22:00:00'
            end_time = '06:00:00'

            [controllers.options]
            humidity_on_threshold = 70.0
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.poll_interval(), Duration::from_secs(10));

        let controllers = config.controller_configs().unwrap();
        assert_eq!(controllers.len(), 1);
        let cellar = &controllers[0];
        assert_eq!(cellar.key.as_str(), "cellar");
        assert!((cellar.full_power_threshold - 5.0).abs() < f64::EPSILON);
        assert!((cellar.humidity_on_threshold - 70.0).abs() < f64::EPSILON);
        assert!((cellar.humidity_off_threshold - 50.0).abs() < f64::EPSILON);
        assert!(cellar.schedule.crosses_midnight());
        assert_eq!(
            cellar.schedule.start,
            NaiveTime::from_hms_opt(22, 0, 0).unwrap()
        );
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_poll_interval() {
        let mut config = Config::default();
        config.engine.poll_interval_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_malformed_time_at_load() {
        let toml = format!("{CELLAR}\nstart_time = '9am'\n");
        let config: Config = toml::from_str(&toml).unwrap();

        let err = config.validate().unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Controller {
                source: DryPlugError::Validation(ValidationError::InvalidTimeOfDay(_)),
                ..
            }
        ));
    }

    #[test]
    fn should_reject_controllers_sharing_a_key() {
        let toml = format!(
            "{CELLAR}
            [[controllers]]
            name = 'cellar!'
            switch_entity = 'switch.other_plug'
            power_sensor = 'sensor.other_plug_power'
            humidity_sensor = 'sensor.other_humidity'
            "
        );
        let config: Config = toml::from_str(&toml).unwrap();

        let err = config.validate().unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Controller {
                source: DryPlugError::Validation(ValidationError::DuplicateController(_)),
                ..
            }
        ));
    }

    #[test]
    fn should_require_entity_references() {
        let toml = "
            [[controllers]]
            name = 'Cellar'
            switch_entity = ''
            power_sensor = 'sensor.cellar_plug_power'
            humidity_sensor = 'sensor.cellar_humidity'
        ";
        let config: Config = toml::from_str(toml).unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();

        config.apply_overrides(env(&[
            ("DRYPLUG_BIND", "127.0.0.1:8080"),
            ("DRYPLUG_DATABASE_URL", "sqlite::memory:"),
            ("DRYPLUG_LOG", "debug"),
        ]));

        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_prefer_rust_log_over_dryplug_log() {
        let mut config = Config::default();

        config.apply_overrides(env(&[("DRYPLUG_LOG", "debug"), ("RUST_LOG", "trace")]));

        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_ignore_unparsable_port() {
        let mut config = Config::default();

        config.apply_overrides(env(&[("DRYPLUG_HOST", "::1"), ("DRYPLUG_PORT", "http")]));

        assert_eq!(config.server.host, "::1");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
