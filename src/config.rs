//! Configuration system using Figment.
//!
//! Settings are merged from, in increasing order of precedence:
//! 1. Built-in defaults ([`Settings::default`])
//! 2. A TOML file (default: `config/seismograph.toml`; missing files are skipped)
//! 3. Environment variables prefixed with `RUSTSEISMO_`
//!
//! # Environment Variable Overrides
//!
//! Nested keys are separated by a double underscore:
//!
//! ```text
//! RUSTSEISMO_APPLICATION__LOG_LEVEL=debug
//! RUSTSEISMO_DISPLAY__SENSITIVITY=2.5
//! RUSTSEISMO_SENSOR__KIND=none
//! ```
//!
//! # Example
//!
//! ```no_run
//! use rust_seismo::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("Sensor: {}", settings.sensor.kind);
//! # Ok::<(), rust_seismo::error::SeismoError>(())
//! ```

use crate::core::DisplayMode;
use crate::error::{AppResult, SeismoError};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "config/seismograph.toml";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "RUSTSEISMO_";

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Application settings
    pub application: ApplicationConfig,
    /// Canvas and trace settings
    pub display: DisplayConfig,
    /// Sensor driver settings
    pub sensor: SensorConfig,
    /// Task and channel sizing
    pub runtime: RuntimeConfig,
}

/// Application-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Application name
    pub name: String,
    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format (pretty, json)
    pub log_format: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: "rust_seismo".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Initial canvas width in pixels
    pub width: f64,
    /// Initial canvas height in pixels
    pub height: f64,
    /// Initial sensitivity gain (> 0)
    pub sensitivity: f64,
    /// Initial display mode ("magnitude" or "axes")
    pub mode: DisplayMode,
    /// Fraction of the half-height used by a full-scale trace, in (0, 1]
    pub amplitude_ratio: f64,
    /// Minimum time between terminal repaints (ms)
    pub repaint_interval_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 240.0,
            sensitivity: 1.0,
            mode: DisplayMode::MagnitudeTrace,
            amplitude_ratio: 0.9,
            repaint_interval_ms: 50,
        }
    }
}

/// Sensor driver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Driver kind ("mock" or "none")
    pub kind: String,
    /// Requested sampling interval (ms); never below 20 ms in practice
    pub interval_ms: u64,
    /// Standard deviation of the mock sensor's resting noise (g)
    pub noise_g: f64,
    /// Probability per sample that the mock sensor starts a tremor
    pub event_probability: f64,
    /// Peak amplitude of a mock tremor (g)
    pub event_peak_g: f64,
    /// Seed for the mock sensor's random source
    pub seed: Option<u64>,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            kind: "mock".to_string(),
            interval_ms: 20,
            noise_g: 0.01,
            event_probability: 0.005,
            event_peak_g: 1.5,
            seed: None,
        }
    }
}

/// Task and channel sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Mailbox capacity of the session actor
    pub command_channel_capacity: usize,
    /// Bound of the sensor-to-session sample channel
    pub sample_channel_capacity: usize,
    /// Most pending samples folded into one render pass
    pub max_batch: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_channel_capacity: 32,
            sample_channel_capacity: 256,
            max_batch: 64,
        }
    }
}

impl Settings {
    /// Load from [`DEFAULT_CONFIG_PATH`] and the environment.
    pub fn load() -> AppResult<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load from a specific TOML file and the environment, then validate.
    pub fn load_from<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let settings: Self = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Render the settings as TOML, e.g. to seed a config file.
    pub fn to_toml(&self) -> AppResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SeismoError::Configuration(format!("Cannot serialize settings: {}", e)))
    }

    /// Check values that parse but make no sense.
    pub fn validate(&self) -> AppResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.application.log_level.as_str()) {
            return Err(SeismoError::Configuration(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                valid_levels.join(", ")
            )));
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.application.log_format.as_str()) {
            return Err(SeismoError::Configuration(format!(
                "Invalid log_format '{}'. Must be one of: {}",
                self.application.log_format,
                valid_formats.join(", ")
            )));
        }

        let display = &self.display;
        if !(display.sensitivity.is_finite() && display.sensitivity > 0.0) {
            return Err(SeismoError::Configuration(format!(
                "Invalid sensitivity {}. Must be a finite value > 0",
                display.sensitivity
            )));
        }
        if !(display.amplitude_ratio > 0.0 && display.amplitude_ratio <= 1.0) {
            return Err(SeismoError::Configuration(format!(
                "Invalid amplitude_ratio {}. Must be in (0, 1]",
                display.amplitude_ratio
            )));
        }
        if !(display.width.is_finite() && display.height.is_finite()) {
            return Err(SeismoError::Configuration(
                "Display width and height must be finite".to_string(),
            ));
        }

        let valid_kinds = ["mock", "none"];
        if !valid_kinds.contains(&self.sensor.kind.as_str()) {
            return Err(SeismoError::Configuration(format!(
                "Invalid sensor kind '{}'. Must be one of: {}",
                self.sensor.kind,
                valid_kinds.join(", ")
            )));
        }
        if !(0.0..=1.0).contains(&self.sensor.event_probability) {
            return Err(SeismoError::Configuration(format!(
                "Invalid event_probability {}. Must be in [0, 1]",
                self.sensor.event_probability
            )));
        }
        if !(self.sensor.noise_g >= 0.0 && self.sensor.event_peak_g >= 0.0) {
            return Err(SeismoError::Configuration(
                "noise_g and event_peak_g must be >= 0".to_string(),
            ));
        }

        let runtime = &self.runtime;
        if runtime.command_channel_capacity == 0
            || runtime.sample_channel_capacity == 0
            || runtime.max_batch == 0
        {
            return Err(SeismoError::Configuration(
                "Runtime channel capacities and max_batch must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    #[serial]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load_from("does/not/exist.toml").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    #[serial]
    fn test_file_overrides_defaults() {
        let file = write_config(
            r#"
            [display]
            sensitivity = 2.5
            mode = "axes"

            [sensor]
            kind = "none"
            "#,
        );
        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.display.sensitivity, 2.5);
        assert_eq!(settings.display.mode, DisplayMode::AxisTraces);
        assert_eq!(settings.sensor.kind, "none");
        // Untouched keys keep their defaults.
        assert_eq!(settings.display.width, 960.0);
        assert_eq!(settings.runtime.max_batch, 64);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let file = write_config("[application]\nlog_level = \"warn\"\n");
        std::env::set_var("RUSTSEISMO_APPLICATION__LOG_LEVEL", "debug");
        let result = Settings::load_from(file.path());
        std::env::remove_var("RUSTSEISMO_APPLICATION__LOG_LEVEL");

        assert_eq!(result.unwrap().application.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_invalid_values_rejected() {
        let file = write_config("[display]\nsensitivity = -1.0\n");
        let err = Settings::load_from(file.path()).unwrap_err();
        assert!(matches!(err, SeismoError::Configuration(_)));

        let file = write_config("[sensor]\nkind = \"lidar\"\n");
        let err = Settings::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("lidar"));
    }

    #[test]
    #[serial]
    fn test_malformed_file_is_config_error() {
        let file = write_config("[display\nwidth = ");
        let err = Settings::load_from(file.path()).unwrap_err();
        assert!(matches!(err, SeismoError::Config(_)));
    }

    #[test]
    #[serial]
    fn test_to_toml_reloads_identically() {
        let mut settings = Settings::default();
        settings.display.mode = DisplayMode::AxisTraces;
        settings.sensor.seed = Some(42);
        let file = write_config(&settings.to_toml().unwrap());
        assert_eq!(Settings::load_from(file.path()).unwrap(), settings);
    }

    #[test]
    fn test_validate_runtime_sizes() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());
        settings.runtime.max_batch = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_amplitude_ratio() {
        let mut settings = Settings::default();
        settings.display.amplitude_ratio = 1.5;
        assert!(settings.validate().is_err());
        settings.display.amplitude_ratio = 1.0;
        assert!(settings.validate().is_ok());
    }
}
