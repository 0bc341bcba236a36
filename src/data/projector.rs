//! Projection of channel histories into canvas coordinates.
//!
//! The projector is the last stage before drawing: it turns an oldest-first
//! sample history into a polyline, applying the user's sensitivity gain and
//! saturating at a display ceiling.
//!
//! # Vertical mapping
//!
//! ```text
//! Unipolar:  n = clamp(min(v * gain, 3) / 3, 0, 1)      y = baseline - n * amplitude
//! Bipolar:   n = clamp(v * gain, -3, 3) / 3             y = baseline - n * amplitude
//! ```
//!
//! The display ceiling (3 g) sits inside the conditioning clamp (4 g) so
//! strong readings still differ visibly from saturated ones.
//!
//! Horizontally, sample `i` lands at `x = i * step`.

use crate::core::{CanvasGeometry, Channel, DisplayMode, Point, ProjectionMode};
use crate::data::channel_set::ChannelSet;
use serde::{Deserialize, Serialize};

/// Signal level (after gain) that reaches the full trace amplitude.
pub const DISPLAY_CEILING: f64 = 3.0;

/// Project a sample history into an ordered point sequence.
///
/// An empty history yields no points. A one-sample history gets a synthetic
/// trailing point at `(step, baseline_y)` so it still draws as a segment.
pub fn project(
    samples: &[f64],
    mode: ProjectionMode,
    step: f64,
    baseline_y: f64,
    amplitude_pixels: f64,
    sensitivity: f64,
) -> Vec<Point> {
    let mut points: Vec<Point> = samples
        .iter()
        .enumerate()
        .map(|(index, &raw)| {
            let normalized = normalize(raw, mode, sensitivity);
            Point::new(index as f64 * step, baseline_y - normalized * amplitude_pixels)
        })
        .collect();

    if points.len() == 1 {
        points.push(Point::new(step, baseline_y));
    }
    points
}

fn normalize(raw: f64, mode: ProjectionMode, sensitivity: f64) -> f64 {
    let scaled = raw * sensitivity;
    let normalized = match mode {
        ProjectionMode::Unipolar => {
            (scaled.min(DISPLAY_CEILING) / DISPLAY_CEILING).clamp(0.0, 1.0)
        }
        ProjectionMode::Bipolar => {
            scaled.clamp(-DISPLAY_CEILING, DISPLAY_CEILING) / DISPLAY_CEILING
        }
    };
    if normalized.is_nan() {
        0.0
    } else {
        normalized
    }
}

/// Polyline for one channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Channel this trace was projected from
    pub channel: Channel,
    /// Points in drawing order (oldest sample first)
    pub points: Vec<Point>,
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceFrame {
    /// Canvas size the points were projected for
    pub geometry: CanvasGeometry,
    /// Vertical coordinate of zero signal
    pub baseline_y: f64,
    /// One trace in magnitude mode, three in axes mode
    pub traces: Vec<Trace>,
}

/// Projects a whole [`ChannelSet`] for the current canvas and display mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveformProjector {
    /// Fraction of the half-height used for a full-scale reading.
    amplitude_ratio: f64,
}

impl Default for WaveformProjector {
    fn default() -> Self {
        Self::new(0.9)
    }
}

impl WaveformProjector {
    /// Create a projector whose full-scale trace spans `amplitude_ratio` of
    /// the space between the baseline and the canvas edge.
    pub fn new(amplitude_ratio: f64) -> Self {
        Self { amplitude_ratio }
    }

    /// Pixel amplitude of a full-scale reading on `geometry`.
    pub fn amplitude_pixels(&self, geometry: &CanvasGeometry) -> f64 {
        geometry.baseline() * self.amplitude_ratio
    }

    /// Build a frame for `mode`, or `None` when the canvas is degenerate or
    /// the histories are empty (the caller should skip the redraw).
    pub fn project_frame(
        &self,
        channels: &ChannelSet,
        geometry: &CanvasGeometry,
        mode: DisplayMode,
        sensitivity: f64,
    ) -> Option<TraceFrame> {
        let capacity = channels.capacity();
        if geometry.is_degenerate() || capacity == 0 {
            return None;
        }

        let step = geometry.step(capacity);
        let baseline_y = geometry.baseline();
        let amplitude = self.amplitude_pixels(geometry);

        let traces = mode
            .channels()
            .iter()
            .map(|&channel| Trace {
                channel,
                points: project(
                    &channels.buffer(channel).snapshot(),
                    channel.projection_mode(),
                    step,
                    baseline_y,
                    amplitude,
                    sensitivity,
                ),
            })
            .collect();

        Some(TraceFrame {
            geometry: *geometry,
            baseline_y,
            traces,
        })
    }
}
