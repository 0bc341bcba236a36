//! Output side of the seismograph: the render surface and status text.
//!
//! The session hands every projected [`TraceFrame`] to a [`RenderSurface`].
//! Surfaces only draw; they never touch sample data or projection logic.

pub mod terminal;

use crate::data::TraceFrame;

pub use terminal::TerminalRenderer;

/// Status text shown when no accelerometer exists.
pub const NO_SENSOR_TEXT: &str = "No accelerometer available";

/// Destination for projected frames and the magnitude readout.
pub trait RenderSurface: Send {
    /// Draw each trace of `frame` as connected line segments.
    fn draw(&mut self, frame: &TraceFrame);

    /// Replace the status line.
    fn show_status(&mut self, text: &str);

    /// Push any throttled output. Called once when the session shuts down.
    fn flush(&mut self) {}
}

/// Format a magnitude delta for the status line, e.g. `"0.042 g"`.
pub fn format_magnitude(magnitude_delta: f64) -> String {
    format!("{:.3} g", magnitude_delta)
}

/// A surface that discards everything. Useful for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn draw(&mut self, _frame: &TraceFrame) {}

    fn show_status(&mut self, _text: &str) {}
}

impl<T: RenderSurface + ?Sized> RenderSurface for Box<T> {
    fn draw(&mut self, frame: &TraceFrame) {
        (**self).draw(frame);
    }

    fn show_status(&mut self, text: &str) {
        (**self).show_status(text);
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}
