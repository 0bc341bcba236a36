//! Message types for actor-based communication
//!
//! Commands sent to the [`SeismographActor`](crate::app_actor::SeismographActor).
//! Each carries a oneshot sender for its reply, so callers can await the
//! outcome without sharing the session behind a lock.

use crate::core::DisplayMode;
use crate::error::AppResult;
use crate::session::SessionStatus;
use tokio::sync::oneshot;

/// Commands that can be sent to the SeismographActor
#[derive(Debug)]
pub enum SessionCommand {
    /// Attach to the sensor and begin recording
    Start {
        response: oneshot::Sender<AppResult<bool>>,
    },

    /// Detach from the sensor
    Stop {
        response: oneshot::Sender<AppResult<bool>>,
    },

    /// Zero every channel history
    Reset { response: oneshot::Sender<()> },

    /// Switch display mode
    SetMode {
        mode: DisplayMode,
        response: oneshot::Sender<()>,
    },

    /// Change sensitivity; replies `false` if the gain was rejected
    SetSensitivity {
        gain: f64,
        response: oneshot::Sender<bool>,
    },

    /// Canvas size changed
    Resize {
        width: f64,
        height: f64,
        response: oneshot::Sender<()>,
    },

    /// Snapshot of the session
    GetStatus {
        response: oneshot::Sender<SessionStatus>,
    },

    /// Stop the session and end the actor
    Shutdown {
        response: oneshot::Sender<AppResult<()>>,
    },
}

impl SessionCommand {
    /// Helper to create a Start command
    pub fn start() -> (Self, oneshot::Receiver<AppResult<bool>>) {
        let (tx, rx) = oneshot::channel();
        (Self::Start { response: tx }, rx)
    }

    /// Helper to create a Stop command
    pub fn stop() -> (Self, oneshot::Receiver<AppResult<bool>>) {
        let (tx, rx) = oneshot::channel();
        (Self::Stop { response: tx }, rx)
    }

    /// Helper to create a Reset command
    pub fn reset() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self::Reset { response: tx }, rx)
    }

    /// Helper to create a SetMode command
    pub fn set_mode(mode: DisplayMode) -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self::SetMode { mode, response: tx }, rx)
    }

    /// Helper to create a SetSensitivity command
    pub fn set_sensitivity(gain: f64) -> (Self, oneshot::Receiver<bool>) {
        let (tx, rx) = oneshot::channel();
        (Self::SetSensitivity { gain, response: tx }, rx)
    }

    /// Helper to create a Resize command
    pub fn resize(width: f64, height: f64) -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (
            Self::Resize {
                width,
                height,
                response: tx,
            },
            rx,
        )
    }

    /// Helper to create a GetStatus command
    pub fn get_status() -> (Self, oneshot::Receiver<SessionStatus>) {
        let (tx, rx) = oneshot::channel();
        (Self::GetStatus { response: tx }, rx)
    }

    /// Helper to create a Shutdown command
    pub fn shutdown() -> (Self, oneshot::Receiver<AppResult<()>>) {
        let (tx, rx) = oneshot::channel();
        (Self::Shutdown { response: tx }, rx)
    }
}
