//! Seismograph session state machine.
//!
//! [`SeismographSession`] ties the pipeline together: it owns the sensor
//! driver, the four channel histories, the projector, and the render surface,
//! and exposes the operations a UI would wire to its controls.
//!
//! # States
//!
//! ```text
//!            start()                stop()
//!   Idle ──────────────▶ Running ─────────────▶ Paused
//!                          ▲                      │
//!                          └────── start() ───────┘
//! ```
//!
//! - `start` only succeeds when the sensor reported itself available at
//!   construction. It zeroes every history before the first sample.
//! - Samples are accepted only while `Running`. Anything arriving in another
//!   state is dropped, never queued.
//! - Geometry, mode, and sensitivity changes work in every state and redraw
//!   immediately from the retained histories.
//!
//! # Serialization
//!
//! The session is a plain value with `&mut self` methods. It is meant to be
//! driven from a single task (see [`crate::app_actor`]), which makes buffer
//! mutation, projection, and sensor attach/detach mutually exclusive.

use crate::config::Settings;
use crate::core::{
    effective_interval, CanvasGeometry, ConditionedSample, DisplayMode, MotionSensor,
    RawMotionVector,
};
use crate::data::{condition, ChannelSet, WaveformProjector};
use crate::error::{AppResult, SeismoError};
use crate::render::{format_magnitude, RenderSurface, NO_SENSOR_TEXT};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

/// Lifecycle state of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Never started
    #[default]
    Idle,
    /// Attached to the sensor and accepting samples
    Running,
    /// Detached after a stop
    Paused,
}

/// Construction parameters for a [`SeismographSession`].
#[derive(Clone, Debug, PartialEq)]
pub struct SessionOptions {
    /// Initial canvas size
    pub geometry: CanvasGeometry,
    /// Initial display mode
    pub mode: DisplayMode,
    /// Initial sensitivity gain
    pub sensitivity: f64,
    /// Fraction of the half-height used by a full-scale trace
    pub amplitude_ratio: f64,
    /// Sampling interval requested from the sensor (before flooring)
    pub requested_interval: Duration,
    /// Bound of the sensor-to-session sample channel
    pub sample_channel_capacity: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            geometry: CanvasGeometry::new(960.0, 240.0),
            mode: DisplayMode::MagnitudeTrace,
            sensitivity: 1.0,
            amplitude_ratio: 0.9,
            requested_interval: Duration::from_millis(20),
            sample_channel_capacity: 256,
        }
    }
}

impl SessionOptions {
    /// Options described by loaded settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            geometry: CanvasGeometry::new(settings.display.width, settings.display.height),
            mode: settings.display.mode,
            sensitivity: settings.display.sensitivity,
            amplitude_ratio: settings.display.amplitude_ratio,
            requested_interval: Duration::from_millis(settings.sensor.interval_ms),
            sample_channel_capacity: settings.runtime.sample_channel_capacity,
        }
    }
}

/// Point-in-time view of a session, for status queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Lifecycle state
    pub state: SessionState,
    /// Current display mode
    pub mode: DisplayMode,
    /// Current sensitivity gain
    pub sensitivity: f64,
    /// Samples kept per channel
    pub capacity: usize,
    /// Whether the sensor exists
    pub sensor_available: bool,
    /// Samples accepted since construction
    pub samples_accepted: u64,
    /// Most recent magnitude delta, if any sample was accepted
    pub last_magnitude_delta: Option<f64>,
}

/// The seismograph: sensor, histories, projection, and output in one value.
pub struct SeismographSession<R: RenderSurface> {
    sensor: Box<dyn MotionSensor>,
    sensor_available: bool,
    surface: R,
    channels: ChannelSet,
    projector: WaveformProjector,
    geometry: CanvasGeometry,
    mode: DisplayMode,
    sensitivity: f64,
    state: SessionState,
    requested_interval: Duration,
    sample_channel_capacity: usize,
    feed: Option<mpsc::Receiver<RawMotionVector>>,
    samples_accepted: u64,
    last_magnitude_delta: Option<f64>,
}

impl<R: RenderSurface> std::fmt::Debug for SeismographSession<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeismographSession")
            .field("sensor", &self.sensor.name())
            .field("sensor_available", &self.sensor_available)
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("sensitivity", &self.sensitivity)
            .field("capacity", &self.channels.capacity())
            .field("geometry", &self.geometry)
            .finish()
    }
}

impl<R: RenderSurface> SeismographSession<R> {
    /// Create an idle session. The sensor's availability is queried exactly
    /// once, here; an unavailable sensor puts the static "no sensor" text on
    /// the surface.
    pub fn new(sensor: Box<dyn MotionSensor>, mut surface: R, options: SessionOptions) -> Self {
        let sensor_available = sensor.is_available();
        if sensor_available {
            info!(sensor = %sensor.name(), "Motion sensor available");
        } else {
            warn!(
                sensor = %sensor.name(),
                "No motion sensor available; start requests will be ignored"
            );
            surface.show_status(NO_SENSOR_TEXT);
        }

        let capacity = options.geometry.capacity();
        let sensitivity = if is_valid_gain(options.sensitivity) {
            options.sensitivity
        } else {
            warn!(gain = options.sensitivity, "Invalid initial sensitivity, using 1.0");
            1.0
        };

        Self {
            sensor,
            sensor_available,
            surface,
            channels: ChannelSet::new(capacity),
            projector: WaveformProjector::new(options.amplitude_ratio),
            geometry: options.geometry,
            mode: options.mode,
            sensitivity,
            state: SessionState::Idle,
            requested_interval: options.requested_interval,
            sample_channel_capacity: options.sample_channel_capacity.max(1),
            feed: None,
            samples_accepted: 0,
            last_magnitude_delta: None,
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Attach to the sensor and begin accepting samples.
    ///
    /// Returns `Ok(false)` without doing anything when already running or when
    /// the sensor is unavailable.
    pub async fn start(&mut self) -> AppResult<bool> {
        if self.state == SessionState::Running {
            debug!("Start ignored: session already running");
            return Ok(false);
        }
        if !self.sensor_available {
            debug!("Start ignored: no sensor");
            return Ok(false);
        }

        let (tx, rx) = mpsc::channel(self.sample_channel_capacity);
        let interval = effective_interval(self.sensor.as_ref(), self.requested_interval);
        self.sensor
            .attach(interval, tx)
            .await
            .map_err(|e| SeismoError::Sensor(format!("{:#}", e)))?;

        let capacity = self.channels.capacity();
        self.channels.reset_all(capacity);
        self.feed = Some(rx);
        self.state = SessionState::Running;
        info!(
            sensor = %self.sensor.name(),
            interval_ms = interval.as_millis() as u64,
            capacity,
            "Session started"
        );
        self.redraw();
        Ok(true)
    }

    /// Detach from the sensor. Returns `Ok(false)` when not running.
    ///
    /// The sample channel is dropped before detaching, so nothing sent by the
    /// old subscription can reach the histories afterwards.
    pub async fn stop(&mut self) -> AppResult<bool> {
        if self.state != SessionState::Running {
            debug!(state = ?self.state, "Stop ignored: session not running");
            return Ok(false);
        }

        self.feed = None;
        self.state = SessionState::Paused;
        self.sensor
            .detach()
            .await
            .map_err(|e| SeismoError::Sensor(format!("{:#}", e)))?;
        info!(samples = self.samples_accepted, "Session paused");
        Ok(true)
    }

    /// Zero every history at the current capacity and redraw.
    pub fn reset(&mut self) {
        let capacity = self.channels.capacity();
        self.channels.reset_all(capacity);
        debug!(capacity, "Channel histories reset");
        self.redraw();
    }

    /// Stop if running and flush the surface. Used on process exit.
    pub async fn shutdown(&mut self) -> AppResult<()> {
        let result = self.stop().await.map(|_| ());
        self.surface.flush();
        result
    }

    // -------------------------------------------------------------------------
    // Samples
    // -------------------------------------------------------------------------

    /// Accept a conditioned sample, then redraw and refresh the readout.
    ///
    /// Returns `false` (and drops the sample) when not running.
    pub fn on_sample_arrived(&mut self, sample: ConditionedSample) -> bool {
        if !self.push_sample(sample) {
            return false;
        }
        self.render();
        true
    }

    /// Condition a raw vector and accept it, without redrawing.
    pub fn push_raw(&mut self, raw: RawMotionVector) -> bool {
        self.push_sample(condition(raw))
    }

    /// Accept a conditioned sample without redrawing.
    ///
    /// Lets a caller push a burst of samples and render once afterwards.
    pub fn push_sample(&mut self, sample: ConditionedSample) -> bool {
        if self.state != SessionState::Running {
            trace!("Sample dropped: session not running");
            return false;
        }
        self.channels.push_all(&sample);
        self.samples_accepted += 1;
        self.last_magnitude_delta = Some(sample.magnitude_delta);
        trace!(magnitude_delta = sample.magnitude_delta, "Sample accepted");
        true
    }

    /// Redraw the traces and refresh the magnitude readout.
    pub fn render(&mut self) {
        self.redraw();
        if let Some(delta) = self.last_magnitude_delta {
            self.surface.show_status(&format_magnitude(delta));
        }
    }

    /// Wait for the next raw vector from the attached sensor.
    ///
    /// Pends forever while detached. Returns `None` when the sensor closed
    /// its end of the feed.
    pub async fn next_raw(&mut self) -> Option<RawMotionVector> {
        match self.feed.as_mut() {
            Some(rx) => rx.recv().await,
            None => std::future::pending().await,
        }
    }

    /// A raw vector that is already waiting, if any.
    pub fn try_next_raw(&mut self) -> Option<RawMotionVector> {
        self.feed.as_mut().and_then(|rx| rx.try_recv().ok())
    }

    /// Handle the sensor ending its feed on its own.
    pub async fn on_feed_closed(&mut self) -> AppResult<()> {
        warn!(sensor = %self.sensor.name(), "Sensor feed closed; pausing session");
        self.stop().await.map(|_| ())
    }

    // -------------------------------------------------------------------------
    // Display controls
    // -------------------------------------------------------------------------

    /// Adopt a new canvas size: recompute capacity and baseline, resize the
    /// histories, and redraw. A degenerate size is ignored.
    pub fn on_geometry_changed(&mut self, width: f64, height: f64) {
        let geometry = CanvasGeometry::new(width, height);
        if geometry.is_degenerate() {
            debug!(width, height, "Degenerate canvas; keeping previous geometry");
            return;
        }

        self.geometry = geometry;
        let capacity = geometry.capacity();
        if capacity != self.channels.capacity() {
            self.channels.resize_all(capacity);
        }
        debug!(width, height, capacity, "Canvas geometry changed");
        self.redraw();
    }

    /// Switch between the magnitude trace and the three axis traces.
    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
        debug!(%mode, "Display mode changed");
        self.redraw();
    }

    /// Change the sensitivity gain and redraw.
    ///
    /// Non-positive or non-finite gains are ignored and `false` is returned.
    pub fn set_sensitivity(&mut self, gain: f64) -> bool {
        if !is_valid_gain(gain) {
            warn!(gain, "Ignoring invalid sensitivity");
            return false;
        }
        self.sensitivity = gain;
        debug!(gain, "Sensitivity changed");
        self.redraw();
        true
    }

    fn redraw(&mut self) {
        if let Some(frame) =
            self.projector
                .project_frame(&self.channels, &self.geometry, self.mode, self.sensitivity)
        {
            self.surface.draw(&frame);
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current display mode.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Current sensitivity gain.
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Samples kept per channel.
    pub fn capacity(&self) -> usize {
        self.channels.capacity()
    }

    /// Current canvas geometry.
    pub fn geometry(&self) -> CanvasGeometry {
        self.geometry
    }

    /// Whether the sensor reported itself available at construction.
    pub fn is_sensor_available(&self) -> bool {
        self.sensor_available
    }

    /// The four channel histories.
    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    /// The render surface.
    pub fn surface(&self) -> &R {
        &self.surface
    }

    /// Mutable access to the render surface.
    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    /// Snapshot for status queries.
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: self.state,
            mode: self.mode,
            sensitivity: self.sensitivity,
            capacity: self.channels.capacity(),
            sensor_available: self.sensor_available,
            samples_accepted: self.samples_accepted,
            last_magnitude_delta: self.last_magnitude_delta,
        }
    }
}

fn is_valid_gain(gain: f64) -> bool {
    gain.is_finite() && gain > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Channel, MAX_CAPACITY, MIN_CAPACITY};
    use crate::data::TraceFrame;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Calls {
        attach: usize,
        detach: usize,
        interval: Option<Duration>,
        sink: Option<mpsc::Sender<RawMotionVector>>,
        fail_attach: bool,
    }

    struct FakeSensor {
        available: bool,
        attached: bool,
        min_interval: Duration,
        calls: Arc<Mutex<Calls>>,
    }

    impl FakeSensor {
        fn new(available: bool) -> (Self, Arc<Mutex<Calls>>) {
            let calls = Arc::new(Mutex::new(Calls::default()));
            let sensor = Self {
                available,
                attached: false,
                min_interval: Duration::from_millis(5),
                calls: calls.clone(),
            };
            (sensor, calls)
        }
    }

    #[async_trait]
    impl MotionSensor for FakeSensor {
        fn name(&self) -> String {
            "fake".to_string()
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn min_interval(&self) -> Duration {
            self.min_interval
        }

        fn is_attached(&self) -> bool {
            self.attached
        }

        async fn attach(
            &mut self,
            interval: Duration,
            sink: mpsc::Sender<RawMotionVector>,
        ) -> anyhow::Result<()> {
            let mut calls = self.calls.lock().unwrap();
            if calls.fail_attach {
                anyhow::bail!("sensor busy");
            }
            calls.attach += 1;
            calls.interval = Some(interval);
            calls.sink = Some(sink);
            self.attached = true;
            Ok(())
        }

        async fn detach(&mut self) -> anyhow::Result<()> {
            let mut calls = self.calls.lock().unwrap();
            calls.detach += 1;
            calls.sink = None;
            self.attached = false;
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSurface {
        frames: Vec<TraceFrame>,
        statuses: Vec<String>,
    }

    impl RenderSurface for RecordingSurface {
        fn draw(&mut self, frame: &TraceFrame) {
            self.frames.push(frame.clone());
        }

        fn show_status(&mut self, text: &str) {
            self.statuses.push(text.to_string());
        }
    }

    fn session(available: bool) -> (SeismographSession<RecordingSurface>, Arc<Mutex<Calls>>) {
        let (sensor, calls) = FakeSensor::new(available);
        let options = SessionOptions {
            geometry: CanvasGeometry::new(90.0, 100.0),
            ..SessionOptions::default()
        };
        let session =
            SeismographSession::new(Box::new(sensor), RecordingSurface::default(), options);
        (session, calls)
    }

    fn sample(magnitude: f64) -> ConditionedSample {
        ConditionedSample {
            axis_x: magnitude,
            axis_y: -magnitude,
            axis_z: 0.0,
            magnitude_delta: magnitude,
        }
    }

    #[tokio::test]
    async fn test_start_and_stop_transitions() {
        let (mut session, calls) = session(true);
        assert_eq!(session.state(), SessionState::Idle);

        assert!(session.start().await.unwrap());
        assert_eq!(session.state(), SessionState::Running);
        assert!(!session.start().await.unwrap(), "second start is a no-op");
        assert_eq!(calls.lock().unwrap().attach, 1);

        assert!(session.stop().await.unwrap());
        assert_eq!(session.state(), SessionState::Paused);
        assert!(!session.stop().await.unwrap(), "second stop is a no-op");
        assert_eq!(calls.lock().unwrap().detach, 1);

        assert!(session.start().await.unwrap());
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(calls.lock().unwrap().attach, 2);
    }

    #[tokio::test]
    async fn test_stop_while_idle_is_noop() {
        let (mut session, calls) = session(true);
        assert!(!session.stop().await.unwrap());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(calls.lock().unwrap().detach, 0);
    }

    #[tokio::test]
    async fn test_unavailable_sensor_never_starts() {
        let (mut session, calls) = session(false);
        assert!(!session.is_sensor_available());
        assert_eq!(session.surface().statuses, vec![NO_SENSOR_TEXT.to_string()]);

        assert!(!session.start().await.unwrap());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(calls.lock().unwrap().attach, 0);
    }

    #[tokio::test]
    async fn test_requested_interval_is_floored() {
        let (mut session, calls) = session(true);
        session.start().await.unwrap();
        assert_eq!(calls.lock().unwrap().interval, Some(Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn test_samples_dropped_unless_running() {
        let (mut session, _calls) = session(true);
        assert!(!session.on_sample_arrived(sample(1.0)));
        assert_eq!(session.status().samples_accepted, 0);

        session.start().await.unwrap();
        assert!(session.on_sample_arrived(sample(1.0)));
        assert_eq!(session.channels().buffer(Channel::Magnitude).newest(), Some(1.0));

        session.stop().await.unwrap();
        assert!(!session.on_sample_arrived(sample(2.0)));
        assert_eq!(session.channels().buffer(Channel::Magnitude).newest(), Some(1.0));
        assert_eq!(session.status().samples_accepted, 1);
    }

    #[tokio::test]
    async fn test_accepted_sample_redraws_and_updates_readout() {
        let (mut session, _calls) = session(true);
        session.start().await.unwrap();
        let frames_before = session.surface().frames.len();

        session.on_sample_arrived(sample(0.0421));
        assert_eq!(session.surface().frames.len(), frames_before + 1);
        assert_eq!(session.surface().statuses.last().unwrap(), "0.042 g");
        assert_eq!(session.status().last_magnitude_delta, Some(0.0421));
    }

    #[tokio::test]
    async fn test_start_resets_histories() {
        let (mut session, _calls) = session(true);
        session.start().await.unwrap();
        for _ in 0..10 {
            session.on_sample_arrived(sample(2.0));
        }
        session.stop().await.unwrap();
        session.start().await.unwrap();
        assert!(session
            .channels()
            .buffer(Channel::Magnitude)
            .iter()
            .all(|v| v == 0.0));
    }

    #[tokio::test]
    async fn test_failed_attach_keeps_state_and_histories() {
        let (mut session, calls) = session(true);
        session.start().await.unwrap();
        session.on_sample_arrived(sample(1.25));
        session.stop().await.unwrap();
        let frames = session.surface().frames.len();

        calls.lock().unwrap().fail_attach = true;
        let err = session.start().await.unwrap_err();
        assert!(matches!(err, SeismoError::Sensor(ref msg) if msg.contains("sensor busy")));

        assert_eq!(session.state(), SessionState::Paused);
        assert!(session.try_next_raw().is_none());
        assert_eq!(session.channels().buffer(Channel::Magnitude).newest(), Some(1.25));
        assert_eq!(session.surface().frames.len(), frames);
        assert_eq!(calls.lock().unwrap().attach, 1);
    }

    #[tokio::test]
    async fn test_stale_samples_cannot_cross_restart() {
        let (mut session, calls) = session(true);
        session.start().await.unwrap();
        let old_sink = calls.lock().unwrap().sink.clone().unwrap();

        session.stop().await.unwrap();
        session.start().await.unwrap();

        // The old sender's receiver was dropped on stop.
        assert!(old_sink.send(RawMotionVector::new(0.0, 0.0, 3.0)).await.is_err());
        assert!(session.try_next_raw().is_none());
    }

    #[tokio::test]
    async fn test_feed_delivers_raw_vectors() {
        let (mut session, calls) = session(true);
        session.start().await.unwrap();
        let sink = calls.lock().unwrap().sink.clone().unwrap();
        sink.send(RawMotionVector::new(0.0, 0.0, 2.0)).await.unwrap();

        let raw = session.next_raw().await.unwrap();
        assert!(session.push_raw(raw));
        session.render();
        assert_eq!(session.channels().buffer(Channel::AxisZ).newest(), Some(1.0));
        assert_eq!(session.surface().statuses.last().unwrap(), "1.000 g");
    }

    #[tokio::test]
    async fn test_geometry_change_resizes_and_keeps_newest() {
        let (mut session, _calls) = session(true);
        assert_eq!(session.capacity(), MIN_CAPACITY);
        session.start().await.unwrap();
        session.on_sample_arrived(sample(1.5));

        session.on_geometry_changed(300.0, 80.0);
        assert_eq!(session.capacity(), 200);
        assert!(session.channels().is_aligned());
        assert_eq!(session.channels().buffer(Channel::Magnitude).newest(), Some(1.5));

        let frame = session.surface().frames.last().unwrap();
        assert_eq!(frame.baseline_y, 40.0);
        assert_eq!(frame.traces[0].points.len(), 200);
    }

    #[tokio::test]
    async fn test_degenerate_geometry_is_ignored() {
        let (mut session, _calls) = session(true);
        let frames = session.surface().frames.len();
        session.on_geometry_changed(0.0, 80.0);
        session.on_geometry_changed(120.0, -3.0);
        session.on_geometry_changed(f64::INFINITY, 80.0);
        assert_eq!(session.geometry(), CanvasGeometry::new(90.0, 100.0));
        assert_eq!(session.surface().frames.len(), frames);
    }

    #[tokio::test]
    async fn test_huge_width_caps_capacity() {
        let (mut session, _calls) = session(true);
        session.start().await.unwrap();
        session.on_sample_arrived(sample(0.5));

        session.on_geometry_changed(1.0e300, 200.0);
        assert_eq!(session.capacity(), MAX_CAPACITY);
        assert!(session.channels().is_aligned());
        assert_eq!(session.channels().buffer(Channel::Magnitude).newest(), Some(0.5));
    }

    #[test]
    fn test_mode_and_sensitivity_redraw_while_idle() {
        let (mut session, _calls) = session(true);

        session.set_mode(DisplayMode::AxisTraces);
        let frame = session.surface().frames.last().unwrap();
        assert_eq!(frame.traces.len(), 3);

        assert!(session.set_sensitivity(2.5));
        assert_eq!(session.sensitivity(), 2.5);
        assert_eq!(session.surface().frames.len(), 2);

        assert!(!session.set_sensitivity(0.0));
        assert!(!session.set_sensitivity(f64::NAN));
        assert_eq!(session.sensitivity(), 2.5);
        assert_eq!(session.surface().frames.len(), 2);
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_invalid_sensitivity_is_logged() {
        let (mut session, _calls) = session(true);
        session.set_sensitivity(-2.0);
        assert!(logs_contain("Ignoring invalid sensitivity"));
    }

    #[tokio::test]
    async fn test_reset_zeroes_and_redraws() {
        let (mut session, _calls) = session(true);
        session.start().await.unwrap();
        session.on_sample_arrived(sample(3.0));
        let frames = session.surface().frames.len();

        session.reset();
        assert_eq!(session.surface().frames.len(), frames + 1);
        assert_eq!(session.channels().buffer(Channel::AxisX).newest(), Some(0.0));
        assert_eq!(session.state(), SessionState::Running);
    }

    #[tokio::test]
    async fn test_shutdown_detaches() {
        let (mut session, calls) = session(true);
        session.start().await.unwrap();
        session.shutdown().await.unwrap();
        assert_eq!(session.state(), SessionState::Paused);
        assert_eq!(calls.lock().unwrap().detach, 1);
    }
}
