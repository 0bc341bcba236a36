//! Core library for the rust_seismo application.
//!
//! A minimal digital seismograph: accelerometer readings are conditioned into
//! four bounded channels (magnitude deviation plus X, Y, Z), kept in rolling
//! histories sized to the canvas, and projected into scrolling waveforms.
//!
//! The pieces, in pipeline order:
//!
//! - [`instrument`]: sensor drivers ([`instrument::MockAccelerometer`],
//!   [`instrument::UnavailableSensor`]) behind [`core::MotionSensor`]
//! - [`data`]: conditioning, rolling buffers, the channel set, projection
//! - [`session`]: the [`session::SeismographSession`] state machine
//! - [`app_actor`]: the task that serializes every session operation
//! - [`render`]: render surfaces, including a terminal renderer
//!
//! The `rust_seismo` binary wires these together with [`config`] and
//! [`logging`].

pub mod app_actor;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod instrument;
pub mod logging;
pub mod messages;
pub mod render;
pub mod session;

pub use app_actor::{spawn_session, SeismographActor, SessionHandle};
pub use error::{AppResult, SeismoError};
pub use session::{SeismographSession, SessionOptions, SessionState, SessionStatus};
