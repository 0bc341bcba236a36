//! Custom error types for the seismograph.
//!
//! This module defines the primary error type, `SeismoError`, used across the
//! crate. Using the `thiserror` crate, it provides a centralized way to report
//! the few things that can actually fail: loading configuration, talking to a
//! sensor driver, and reaching the session actor.
//!
//! ## Error Hierarchy
//!
//! - **`Config`**: Wraps errors from `figment`, typically file parsing or type
//!   mismatches in the configuration sources.
//! - **`Configuration`**: Semantic errors in configuration values that parsed
//!   fine but make no sense (e.g. a negative sensitivity). Caught by
//!   `Settings::validate`.
//! - **`Io`**: Wraps `std::io::Error` from the terminal backend (taking over
//!   and restoring the screen).
//! - **`Sensor`**: A sensor driver refused to attach or detach.
//! - **`ActorClosed`**: The session actor has shut down and can no longer take
//!   commands.
//!
//! Note that an absent sensor and a zero-sized canvas are *not* errors. The
//! former is a permanent state of the session, the latter a transient layout
//! condition that simply skips a redraw.

use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type AppResult<T> = std::result::Result<T, SeismoError>;

#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum SeismoError {
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Configuration validation error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sensor error: {0}")]
    Sensor(String),

    #[error("Session actor is no longer running")]
    ActorClosed,
}

impl From<figment::Error> for SeismoError {
    fn from(err: figment::Error) -> Self {
        SeismoError::Config(Box::new(err))
    }
}
