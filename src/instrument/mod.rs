//! Sensor drivers and the registry that builds them from configuration.

pub mod mock;

use crate::config::SensorConfig;
use crate::core::{MotionSensor, RawMotionVector};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

pub use mock::{MockAccelerometer, MotionSimulator};

type SensorFactory = Box<dyn Fn(&SensorConfig) -> Result<Box<dyn MotionSensor>> + Send + Sync>;

/// Maps a `sensor.kind` string to a driver constructor.
pub struct SensorRegistry {
    factories: HashMap<String, SensorFactory>,
}

impl Default for SensorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorRegistry {
    /// Registry with the built-in `mock` and `none` drivers.
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("mock", |config| {
            Ok(Box::new(MockAccelerometer::from_config(config)) as Box<dyn MotionSensor>)
        });
        registry.register("none", |_config| {
            Ok(Box::new(UnavailableSensor) as Box<dyn MotionSensor>)
        });
        registry
    }

    /// Add or replace a driver constructor.
    pub fn register<F>(&mut self, kind: &str, factory: F)
    where
        F: Fn(&SensorConfig) -> Result<Box<dyn MotionSensor>> + Send + Sync + 'static,
    {
        self.factories.insert(kind.to_string(), Box::new(factory));
    }

    /// Build the driver named by `config.kind`.
    pub fn create(&self, config: &SensorConfig) -> Result<Box<dyn MotionSensor>> {
        self.factories
            .get(config.kind.as_str())
            .ok_or_else(|| anyhow!("Sensor kind '{}' not registered", config.kind))
            .and_then(|factory| factory(config))
    }

    /// Registered kinds, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.factories.keys().cloned().collect();
        kinds.sort();
        kinds
    }
}

/// Build a driver with the default registry.
pub fn create_sensor(config: &SensorConfig) -> Result<Box<dyn MotionSensor>> {
    SensorRegistry::new().create(config)
}

/// Stand-in for a device without an accelerometer.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableSensor;

#[async_trait]
impl MotionSensor for UnavailableSensor {
    fn name(&self) -> String {
        "No Sensor".to_string()
    }

    fn is_available(&self) -> bool {
        false
    }

    fn min_interval(&self) -> Duration {
        Duration::ZERO
    }

    fn is_attached(&self) -> bool {
        false
    }

    async fn attach(
        &mut self,
        _interval: Duration,
        _sink: mpsc::Sender<RawMotionVector>,
    ) -> Result<()> {
        Err(anyhow!("No accelerometer present"))
    }

    async fn detach(&mut self) -> Result<()> {
        Ok(())
    }
}
