//! A mock accelerometer that generates synthetic motion.
//!
//! At rest the device reports gravity on Z plus a little Gaussian noise. Now
//! and then it starts a "tremor": a decaying oscillation along a random
//! direction, which is what makes the seismograph trace worth watching.
use crate::config::SensorConfig;
use crate::core::{MotionSensor, RawMotionVector};
use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Ticks a tremor lasts before it has decayed away.
const TREMOR_TICKS: u32 = 150;

/// Oscillation advance per tick (radians).
const TREMOR_PHASE_STEP: f64 = 0.45;

#[derive(Clone, Copy, Debug)]
struct Tremor {
    direction: [f64; 3],
    peak_g: f64,
    tick: u32,
}

impl Tremor {
    fn value(&self) -> f64 {
        let t = self.tick as f64;
        let envelope = (-4.0 * t / TREMOR_TICKS as f64).exp();
        self.peak_g * envelope * (t * TREMOR_PHASE_STEP).sin()
    }
}

/// Deterministic (when seeded) source of synthetic motion vectors.
#[derive(Debug)]
pub struct MotionSimulator {
    rng: StdRng,
    noise_g: f64,
    event_probability: f64,
    event_peak_g: f64,
    tremor: Option<Tremor>,
}

impl MotionSimulator {
    /// Simulator configured from `sensor` settings.
    pub fn from_config(config: &SensorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            noise_g: config.noise_g.max(0.0),
            event_probability: config.event_probability.clamp(0.0, 1.0),
            event_peak_g: config.event_peak_g.max(0.0),
            tremor: None,
        }
    }

    /// Whether a tremor is currently in progress.
    pub fn in_tremor(&self) -> bool {
        self.tremor.is_some()
    }

    /// Produce the next reading.
    pub fn next_vector(&mut self) -> RawMotionVector {
        if self.tremor.is_none()
            && self.event_probability > 0.0
            && self.rng.gen_bool(self.event_probability)
        {
            self.tremor = Some(self.new_tremor());
        }

        let mut vector = RawMotionVector::new(
            self.gaussian() * self.noise_g,
            self.gaussian() * self.noise_g,
            1.0 + self.gaussian() * self.noise_g,
        );

        if let Some(tremor) = self.tremor.as_mut() {
            let shake = tremor.value();
            vector.x += tremor.direction[0] * shake;
            vector.y += tremor.direction[1] * shake;
            vector.z += tremor.direction[2] * shake;
            tremor.tick += 1;
            if tremor.tick >= TREMOR_TICKS {
                self.tremor = None;
            }
        }

        vector
    }

    fn new_tremor(&mut self) -> Tremor {
        // Uniform direction on the unit sphere.
        let z: f64 = self.rng.gen_range(-1.0..=1.0);
        let theta: f64 = self.rng.gen_range(0.0..TAU);
        let r = (1.0 - z * z).sqrt();
        let peak_g = self.event_peak_g * self.rng.gen_range(0.5..=1.0);
        Tremor {
            direction: [r * theta.cos(), r * theta.sin(), z],
            peak_g,
            tick: 0,
        }
    }

    /// Standard normal sample (Box-Muller).
    fn gaussian(&mut self) -> f64 {
        let u1: f64 = self.rng.gen_range(f64::EPSILON..1.0);
        let u2: f64 = self.rng.gen();
        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }
}

/// Simulated accelerometer streaming [`MotionSimulator`] output.
pub struct MockAccelerometer {
    config: SensorConfig,
    task: Option<JoinHandle<()>>,
}

impl MockAccelerometer {
    /// Mock driven by `config`.
    pub fn from_config(config: &SensorConfig) -> Self {
        Self {
            config: config.clone(),
            task: None,
        }
    }
}

impl Default for MockAccelerometer {
    fn default() -> Self {
        Self::from_config(&SensorConfig::default())
    }
}

impl Drop for MockAccelerometer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[async_trait]
impl MotionSensor for MockAccelerometer {
    fn name(&self) -> String {
        "Mock Accelerometer".to_string()
    }

    fn is_available(&self) -> bool {
        true
    }

    fn min_interval(&self) -> Duration {
        Duration::from_millis(10)
    }

    fn is_attached(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    async fn attach(
        &mut self,
        period: Duration,
        sink: mpsc::Sender<RawMotionVector>,
    ) -> Result<()> {
        if self.is_attached() {
            debug!("Mock accelerometer already attached");
            return Ok(());
        }

        info!(interval_ms = period.as_millis() as u64, "Attaching mock accelerometer");
        let mut simulator = MotionSimulator::from_config(&self.config);
        let period = period.max(Duration::from_millis(1));

        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if sink.send(simulator.next_vector()).await.is_err() {
                    // Receiver dropped: the session detached or stopped.
                    break;
                }
            }
            debug!("Mock accelerometer feed ended");
        }));
        Ok(())
    }

    async fn detach(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            info!("Detaching mock accelerometer");
            task.abort();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::condition;

    fn quiet_config(seed: u64) -> SensorConfig {
        SensorConfig {
            noise_g: 0.01,
            event_probability: 0.0,
            seed: Some(seed),
            ..SensorConfig::default()
        }
    }

    #[test]
    fn test_seeded_simulator_is_deterministic() {
        let config = SensorConfig {
            seed: Some(7),
            event_probability: 0.2,
            ..SensorConfig::default()
        };
        let mut a = MotionSimulator::from_config(&config);
        let mut b = MotionSimulator::from_config(&config);
        for _ in 0..200 {
            assert_eq!(a.next_vector(), b.next_vector());
        }
    }

    #[test]
    fn test_resting_device_reads_near_gravity() {
        let mut sim = MotionSimulator::from_config(&quiet_config(1));
        for _ in 0..500 {
            let sample = condition(sim.next_vector());
            assert!(sample.magnitude_delta < 0.1, "{sample:?}");
            assert!(sample.axis_z.abs() < 0.1, "{sample:?}");
        }
        assert!(!sim.in_tremor());
    }

    #[test]
    fn test_tremor_produces_large_motion_then_decays() {
        let config = SensorConfig {
            noise_g: 0.0,
            event_probability: 1.0,
            event_peak_g: 2.0,
            seed: Some(3),
            ..SensorConfig::default()
        };
        let mut sim = MotionSimulator::from_config(&config);
        let peak = (0..40)
            .map(|_| condition(sim.next_vector()).magnitude_delta)
            .fold(0.0_f64, f64::max);
        assert!(peak > 0.25, "peak {peak}");
        assert!(sim.in_tremor());
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_streams_and_detach_stops() {
        let mut sensor = MockAccelerometer::from_config(&quiet_config(11));
        let (tx, mut rx) = mpsc::channel(16);
        sensor.attach(Duration::from_millis(20), tx).await.unwrap();
        assert!(sensor.is_attached());

        for _ in 0..3 {
            let v = rx.recv().await.unwrap();
            assert!((v.z - 1.0).abs() < 0.1);
        }

        sensor.detach().await.unwrap();
        assert!(!sensor.is_attached());
        // Sender was owned by the aborted task, so the channel drains and closes.
        while rx.recv().await.is_some() {}
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_twice_is_noop() {
        let mut sensor = MockAccelerometer::from_config(&quiet_config(5));
        let (tx1, mut rx1) = mpsc::channel(4);
        let (tx2, mut rx2) = mpsc::channel(4);
        sensor.attach(Duration::from_millis(20), tx1).await.unwrap();
        sensor.attach(Duration::from_millis(20), tx2).await.unwrap();

        assert!(rx1.recv().await.is_some());
        // The second sink was dropped without being used.
        assert!(rx2.recv().await.is_none());
        sensor.detach().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_ends_when_receiver_dropped() {
        let mut sensor = MockAccelerometer::from_config(&quiet_config(9));
        let (tx, rx) = mpsc::channel(1);
        sensor.attach(Duration::from_millis(20), tx).await.unwrap();
        drop(rx);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!sensor.is_attached());
    }
}
