//! Core traits and data types for the seismograph.
//!
//! This module defines the vocabulary shared by every stage of the signal
//! pipeline, plus the capability trait implemented by sensor drivers.
//!
//! # Data Flow
//!
//! ```text
//! MotionSensor --[RawMotionVector]--> mpsc --> conditioner --[ConditionedSample]-->
//!     SeismographSession --> ChannelSet --> WaveformProjector --[TraceFrame]--> RenderSurface
//! ```
//!
//! # Thread Safety
//!
//! Sensor drivers must be `Send` so the session actor can own them inside a
//! tokio task. Samples cross from the driver's task to the actor through a
//! bounded `mpsc` channel; nothing else is shared between tasks.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;

// =============================================================================
// Samples
// =============================================================================

/// Instantaneous acceleration along three axes, in units of g.
///
/// A stationary device lying flat reports roughly `(0, 0, 1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMotionVector {
    /// Acceleration along X (g)
    pub x: f64,
    /// Acceleration along Y (g)
    pub y: f64,
    /// Acceleration along Z (g)
    pub z: f64,
}

impl RawMotionVector {
    /// Creates a vector from its three components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm of the vector.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// A motion reading after gravity compensation and clamping.
///
/// Every field is finite. `magnitude_delta` lies in `[0, 4]`, the axis values
/// in `[-4, 4]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionedSample {
    /// X acceleration, clamped (g)
    pub axis_x: f64,
    /// Y acceleration, clamped (g)
    pub axis_y: f64,
    /// Z acceleration minus gravity, clamped (g)
    pub axis_z: f64,
    /// Deviation of the total magnitude from 1 g, capped (g)
    pub magnitude_delta: f64,
}

impl ConditionedSample {
    /// Value of this sample on the given channel.
    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Magnitude => self.magnitude_delta,
            Channel::AxisX => self.axis_x,
            Channel::AxisY => self.axis_y,
            Channel::AxisZ => self.axis_z,
        }
    }
}

// =============================================================================
// Channels and display modes
// =============================================================================

/// One of the four scalar time series tracked by the seismograph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Gravity-compensated total magnitude
    Magnitude,
    /// X axis
    AxisX,
    /// Y axis
    AxisY,
    /// Z axis (gravity removed)
    AxisZ,
}

impl Channel {
    /// All channels in their canonical order.
    pub const ALL: [Channel; 4] = [
        Channel::Magnitude,
        Channel::AxisX,
        Channel::AxisY,
        Channel::AxisZ,
    ];

    /// The three raw axes, in X, Y, Z order.
    pub const AXES: [Channel; 3] = [Channel::AxisX, Channel::AxisY, Channel::AxisZ];

    /// Position of this channel in [`Channel::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Channel::Magnitude => 0,
            Channel::AxisX => 1,
            Channel::AxisY => 2,
            Channel::AxisZ => 3,
        }
    }

    /// How this channel's history is mapped to the screen.
    pub const fn projection_mode(self) -> ProjectionMode {
        match self {
            Channel::Magnitude => ProjectionMode::Unipolar,
            Channel::AxisX | Channel::AxisY | Channel::AxisZ => ProjectionMode::Bipolar,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Channel::Magnitude => "magnitude",
            Channel::AxisX => "x",
            Channel::AxisY => "y",
            Channel::AxisZ => "z",
        };
        f.write_str(label)
    }
}

/// Which traces the seismograph draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// A single unipolar trace of the magnitude delta
    #[default]
    #[serde(alias = "magnitude")]
    MagnitudeTrace,
    /// Three bipolar traces, one per axis
    #[serde(alias = "axes")]
    AxisTraces,
}

impl DisplayMode {
    /// Channels drawn in this mode, in drawing order.
    pub fn channels(self) -> &'static [Channel] {
        match self {
            DisplayMode::MagnitudeTrace => &[Channel::Magnitude],
            DisplayMode::AxisTraces => &Channel::AXES,
        }
    }

    /// Parses the short names used in config files and on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "magnitude" | "magnitude_trace" => Some(DisplayMode::MagnitudeTrace),
            "axes" | "axis_traces" => Some(DisplayMode::AxisTraces),
            _ => None,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::MagnitudeTrace => f.write_str("magnitude"),
            DisplayMode::AxisTraces => f.write_str("axes"),
        }
    }
}

/// Vertical mapping applied to one channel during projection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Values in `[0, ceiling]` drawn above the baseline only
    Unipolar,
    /// Values in `[-ceiling, ceiling]` drawn on both sides of the baseline
    Bipolar,
}

// =============================================================================
// Geometry
// =============================================================================

/// A 2-D point in canvas pixel space (y grows downward).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal pixel coordinate
    pub x: f64,
    /// Vertical pixel coordinate
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Smallest number of samples kept per channel.
pub const MIN_CAPACITY: usize = 64;

/// Largest number of samples kept per channel, whatever the canvas width.
pub const MAX_CAPACITY: usize = 16_384;

/// Horizontal pixels allotted to each sample.
pub const PIXELS_PER_SAMPLE: f64 = 1.5;

/// Size of the drawing canvas in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasGeometry {
    /// Canvas width (px)
    pub width: f64,
    /// Canvas height (px)
    pub height: f64,
}

impl CanvasGeometry {
    /// Creates a geometry.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is non-positive or not finite, as happens
    /// transiently during layout.
    pub fn is_degenerate(&self) -> bool {
        let positive = self.width > 0.0 && self.height > 0.0;
        !(positive && self.width.is_finite() && self.height.is_finite())
    }

    /// History length that gives each sample about 1.5 px, kept within
    /// [`MIN_CAPACITY`]..=[`MAX_CAPACITY`].
    pub fn capacity(&self) -> usize {
        if self.is_degenerate() {
            return MIN_CAPACITY;
        }
        let fitted = (self.width / PIXELS_PER_SAMPLE)
            .round()
            .min(MAX_CAPACITY as f64) as usize;
        fitted.max(MIN_CAPACITY)
    }

    /// Horizontal distance between consecutive samples for a history of
    /// `capacity` samples.
    pub fn step(&self, capacity: usize) -> f64 {
        if capacity > 1 {
            self.width / (capacity - 1) as f64
        } else {
            self.width
        }
    }

    /// Vertical coordinate of zero signal.
    pub fn baseline(&self) -> f64 {
        self.height / 2.0
    }
}

// =============================================================================
// Sensor capability
// =============================================================================

/// Floor applied to the sampling interval requested from any sensor.
pub const MIN_SENSOR_INTERVAL: Duration = Duration::from_millis(20);

/// A source of [`RawMotionVector`] events.
///
/// Availability is a fixed property of the driver: a sensor that reports
/// `false` once never becomes available later. `attach` while already attached
/// and `detach` while detached must both be no-ops.
#[async_trait]
pub trait MotionSensor: Send {
    /// Human-readable driver name.
    fn name(&self) -> String;

    /// Whether the hardware (or simulation) exists at all.
    fn is_available(&self) -> bool;

    /// Shortest sampling interval the driver supports.
    fn min_interval(&self) -> Duration;

    /// Whether samples are currently being delivered.
    fn is_attached(&self) -> bool;

    /// Starts delivering samples into `sink` at roughly `interval`.
    async fn attach(
        &mut self,
        interval: Duration,
        sink: mpsc::Sender<RawMotionVector>,
    ) -> Result<()>;

    /// Stops delivering samples.
    async fn detach(&mut self) -> Result<()>;
}

/// Interval to request from `sensor`: the larger of the configured interval,
/// the driver minimum, and [`MIN_SENSOR_INTERVAL`].
pub fn effective_interval(sensor: &dyn MotionSensor, requested: Duration) -> Duration {
    requested
        .max(sensor.min_interval())
        .max(MIN_SENSOR_INTERVAL)
}
