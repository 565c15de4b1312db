use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::driver::SessionOptions;
use crate::session::MeasureConfig;

/// How the sample index column is numbered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexMode {
    /// Restart at 0 for every fetch call
    #[default]
    PerFetch,
    /// Count from 0 across all fetches of a channel
    Cumulative,
}

/// Settings for one measure-record run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    /// Instrument resources to open, in order
    pub resource_names: Vec<String>,
    /// Samples to collect per channel
    pub record_length: i64,
    /// Source voltage level in volts
    pub voltage_level: f64,
    pub option_string: String,
    pub server_address: String,
    pub server_port: String,
    /// Empty opens a new unnamed session
    pub session_name: String,
    pub fetch_timeout_secs: f64,
    pub connect_timeout_secs: f64,
    pub index_mode: IndexMode,
    /// JSONL file receiving every displayed sample
    pub sample_log: Option<PathBuf>,
    pub log_level: String,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            resource_names: parse_resource_names("PXI1Slot2/0, PXI1Slot3/0-1"),
            record_length: 20,
            voltage_level: 5.0,
            option_string: String::new(),
            server_address: "localhost".to_string(),
            server_port: "31763".to_string(),
            session_name: String::new(),
            fetch_timeout_secs: 1.0,
            connect_timeout_secs: 5.0,
            index_mode: IndexMode::PerFetch,
            sample_log: None,
            log_level: "warn".to_string(),
        }
    }
}

impl RecordConfig {
    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resource_names.is_empty() {
            return Err(ConfigError::Message(
                "at least one resource name is required".to_string(),
            ));
        }
        if self.resource_names.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Message(format!(
                "resource names must not be blank, got {:?}",
                self.resource_names
            )));
        }
        if self.server_address.trim().is_empty() {
            return Err(ConfigError::Message("server address must not be empty".to_string()));
        }
        if self.server_port.trim().parse::<u16>().is_err() {
            return Err(ConfigError::Message(format!(
                "server port must be a TCP port number, got '{}'",
                self.server_port
            )));
        }
        if i32::try_from(self.record_length).is_err() {
            return Err(ConfigError::Message(format!(
                "record length {} does not fit the driver's 32-bit attribute",
                self.record_length
            )));
        }
        if !(self.fetch_timeout_secs > 0.0 && self.fetch_timeout_secs.is_finite()) {
            return Err(ConfigError::Message(format!(
                "fetch timeout must be positive, got {}",
                self.fetch_timeout_secs
            )));
        }
        if !(self.connect_timeout_secs > 0.0 && self.connect_timeout_secs.is_finite()) {
            return Err(ConfigError::Message(format!(
                "connect timeout must be positive, got {}",
                self.connect_timeout_secs
            )));
        }
        Ok(())
    }

    /// Samples to drain per channel; zero when the length is not positive
    pub fn samples_per_channel(&self) -> usize {
        usize::try_from(self.record_length).unwrap_or(0)
    }

    pub fn measure_config(&self) -> MeasureConfig {
        // validate() keeps the length in range; saturate for unvalidated input
        let record_length = self
            .record_length
            .clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        MeasureConfig::new(record_length, self.voltage_level)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions::named(self.session_name.clone())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.fetch_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.connect_timeout_secs)
    }
}

/// Split a comma-separated resource list, dropping empty entries
pub fn parse_resource_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load configuration from defaults, an optional TOML file and the environment.
///
/// Environment variables use the `DCPOWER_` prefix, for example
/// `DCPOWER_SERVER_ADDRESS=10.0.0.2` or
/// `DCPOWER_RESOURCE_NAMES="PXI1Slot2/0,PXI1Slot3/0"`.
///
/// # Errors
/// Fails if `config_path` is given but missing or malformed, or if the
/// merged configuration does not validate.
pub fn load_config(config_path: Option<&Path>) -> Result<RecordConfig, ConfigError> {
    load_layers(config_path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix("DCPOWER")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("resource_names")
}

fn load_layers(
    config_path: Option<&Path>,
    env: Environment,
) -> Result<RecordConfig, ConfigError> {
    let mut builder = Config::builder().add_source(Config::try_from(&RecordConfig::default())?);

    if let Some(path) = config_path {
        if !path.exists() {
            return Err(ConfigError::Message(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        builder = builder.add_source(File::from(path));
    }

    let mut record_config = builder
        .add_source(env)
        .build()?
        .try_deserialize::<RecordConfig>()?;
    // list values from the environment arrive untrimmed
    record_config.resource_names = parse_resource_names(&record_config.resource_names.join(","));
    record_config.validate()?;
    Ok(record_config)
}
