//! Gravity compensation and clamping of raw accelerometer vectors.
//!
//! [`condition`] is a pure, total function: it never fails and always returns
//! finite values inside the documented bounds, whatever the driver reports.

use crate::core::{ConditionedSample, RawMotionVector};

/// Magnitude of Earth gravity in g.
pub const GRAVITY_G: f64 = 1.0;

/// Physical clamp applied to every conditioned field (g).
pub const CONDITION_CEILING: f64 = 4.0;

/// Converts a raw vector into a bounded, gravity-compensated sample.
///
/// - `magnitude_delta = min(| |raw| - 1 |, 4)`
/// - `axis_x`, `axis_y` are clamped to `[-4, 4]`
/// - `axis_z = clamp(z - 1, -4, 4)`, since a device at rest reports ~1 g on Z
///
/// NaN components are treated as zero so the output stays finite.
pub fn condition(raw: RawMotionVector) -> ConditionedSample {
    let raw = RawMotionVector::new(nan_to_zero(raw.x), nan_to_zero(raw.y), nan_to_zero(raw.z));

    let magnitude = raw.magnitude();
    let magnitude_delta = if magnitude.is_finite() {
        (magnitude - GRAVITY_G).abs().min(CONDITION_CEILING)
    } else {
        CONDITION_CEILING
    };

    ConditionedSample {
        axis_x: clamp_axis(raw.x),
        axis_y: clamp_axis(raw.y),
        axis_z: clamp_axis(raw.z - GRAVITY_G),
        magnitude_delta,
    }
}

fn clamp_axis(value: f64) -> f64 {
    value.clamp(-CONDITION_CEILING, CONDITION_CEILING)
}

fn nan_to_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}
