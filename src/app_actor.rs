//! Actor that owns the seismograph session.
//!
//! All session state lives in one tokio task. Control requests arrive as
//! [`SessionCommand`] messages and samples arrive on the feed opened by
//! `start`; both are handled in the same loop, so a resize can never observe a
//! half-pushed sample and a stop can never race an attach.

use crate::config::RuntimeConfig;
use crate::core::{DisplayMode, RawMotionVector};
use crate::error::{AppResult, SeismoError};
use crate::messages::SessionCommand;
use crate::render::RenderSurface;
use crate::session::{SeismographSession, SessionStatus};
use std::ops::ControlFlow;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace};

/// Actor that serializes every operation on a [`SeismographSession`].
pub struct SeismographActor<R: RenderSurface> {
    session: SeismographSession<R>,
    max_batch: usize,
}

impl<R: RenderSurface> SeismographActor<R> {
    /// Wrap a session. At most `max_batch` extra pending samples are folded
    /// into one render pass.
    pub fn new(session: SeismographSession<R>, max_batch: usize) -> Self {
        Self {
            session,
            max_batch,
        }
    }

    /// Runs the actor event loop until shutdown or until every handle is
    /// dropped. Returns the session so callers can inspect it afterwards.
    pub async fn run(
        mut self,
        mut command_rx: mpsc::Receiver<SessionCommand>,
    ) -> SeismographSession<R> {
        info!("SeismographActor started");

        loop {
            tokio::select! {
                biased;

                command = command_rx.recv() => match command {
                    Some(command) => {
                        if self.handle_command(command).await.is_break() {
                            break;
                        }
                    }
                    None => {
                        info!("All session handles dropped");
                        if let Err(e) = self.session.shutdown().await {
                            error!("Failed to shut down session: {}", e);
                        }
                        break;
                    }
                },

                raw = self.session.next_raw() => match raw {
                    Some(raw) => self.on_samples(raw),
                    None => {
                        if let Err(e) = self.session.on_feed_closed().await {
                            error!("Failed to pause after feed closed: {}", e);
                        }
                    }
                },
            }
        }

        info!("SeismographActor shutting down");
        self.session
    }

    async fn handle_command(&mut self, command: SessionCommand) -> ControlFlow<()> {
        match command {
            SessionCommand::Start { response } => {
                let result = self.session.start().await;
                let _ = response.send(result);
            }

            SessionCommand::Stop { response } => {
                let result = self.session.stop().await;
                let _ = response.send(result);
            }

            SessionCommand::Reset { response } => {
                self.session.reset();
                let _ = response.send(());
            }

            SessionCommand::SetMode { mode, response } => {
                self.session.set_mode(mode);
                let _ = response.send(());
            }

            SessionCommand::SetSensitivity { gain, response } => {
                let accepted = self.session.set_sensitivity(gain);
                let _ = response.send(accepted);
            }

            SessionCommand::Resize {
                width,
                height,
                response,
            } => {
                self.session.on_geometry_changed(width, height);
                let _ = response.send(());
            }

            SessionCommand::GetStatus { response } => {
                let _ = response.send(self.session.status());
            }

            SessionCommand::Shutdown { response } => {
                info!("Shutdown command received");
                let result = self.session.shutdown().await;
                let _ = response.send(result);
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Push `first` plus whatever else is already queued, then draw once.
    fn on_samples(&mut self, first: RawMotionVector) {
        let mut accepted = usize::from(self.session.push_raw(first));
        let mut drained = 0;
        while drained < self.max_batch {
            match self.session.try_next_raw() {
                Some(raw) => {
                    accepted += usize::from(self.session.push_raw(raw));
                    drained += 1;
                }
                None => break,
            }
        }

        if accepted > 0 {
            trace!(accepted, "Rendering sample batch");
            self.session.render();
        }
    }
}

/// Cloneable handle for sending commands to a running [`SeismographActor`].
#[derive(Clone, Debug)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Wrap the sending side of an actor's mailbox.
    pub fn new(command_tx: mpsc::Sender<SessionCommand>) -> Self {
        Self { command_tx }
    }

    /// Start recording. `Ok(false)` if already running or no sensor exists.
    pub async fn start(&self) -> AppResult<bool> {
        let (cmd, rx) = SessionCommand::start();
        self.request(cmd, rx).await?
    }

    /// Stop recording. `Ok(false)` if not running.
    pub async fn stop(&self) -> AppResult<bool> {
        let (cmd, rx) = SessionCommand::stop();
        self.request(cmd, rx).await?
    }

    /// Zero every channel history.
    pub async fn reset(&self) -> AppResult<()> {
        let (cmd, rx) = SessionCommand::reset();
        self.request(cmd, rx).await
    }

    /// Switch display mode.
    pub async fn set_mode(&self, mode: DisplayMode) -> AppResult<()> {
        let (cmd, rx) = SessionCommand::set_mode(mode);
        self.request(cmd, rx).await
    }

    /// Change sensitivity. `Ok(false)` if the gain was rejected.
    pub async fn set_sensitivity(&self, gain: f64) -> AppResult<bool> {
        let (cmd, rx) = SessionCommand::set_sensitivity(gain);
        self.request(cmd, rx).await
    }

    /// Report a new canvas size.
    pub async fn resize(&self, width: f64, height: f64) -> AppResult<()> {
        let (cmd, rx) = SessionCommand::resize(width, height);
        self.request(cmd, rx).await
    }

    /// Current session snapshot.
    pub async fn status(&self) -> AppResult<SessionStatus> {
        let (cmd, rx) = SessionCommand::get_status();
        self.request(cmd, rx).await
    }

    /// Detach the sensor and end the actor.
    pub async fn shutdown(&self) -> AppResult<()> {
        let (cmd, rx) = SessionCommand::shutdown();
        self.request(cmd, rx).await?
    }

    async fn request<T>(&self, cmd: SessionCommand, rx: oneshot::Receiver<T>) -> AppResult<T> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| SeismoError::ActorClosed)?;
        rx.await.map_err(|_| SeismoError::ActorClosed)
    }
}

/// Spawn an actor for `session` on the current runtime.
pub fn spawn_session<R>(
    session: SeismographSession<R>,
    runtime: &RuntimeConfig,
) -> (SessionHandle, JoinHandle<SeismographSession<R>>)
where
    R: RenderSurface + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(runtime.command_channel_capacity.max(1));
    let actor = SeismographActor::new(session, runtime.max_batch);
    debug!(
        command_capacity = runtime.command_channel_capacity,
        max_batch = runtime.max_batch,
        "Spawning session actor"
    );
    let task = tokio::spawn(actor.run(command_rx));
    (SessionHandle::new(command_tx), task)
}
