//! Controller-driven scheduler
//!
//! Keeps a connection to the controller alive and turns its commands into
//! session starts and stops:
//!
//! ```text
//! ┌──────────── reconnect loop ─────────────┐
//! │ open ─► current ─► next ─► next ─► ...  │
//! │   ▲                          │          │
//! │   └── sleep(reconnect) ◄─ transport err │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The scheduler owns at most one [`SessionHandle`]. A session keeps playing
//! while the controller is unreachable; only a `Stop` command or shutdown
//! cancels it.

use std::sync::Arc;
use std::time::Duration;

use drift_config::HookingMethod;
use drift_model::Emulation;
use drift_session::{
    EmulationSession, PlaybackSettings, PlaybackState, SampleSink, SessionError, SessionHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::channel::{Command, ControlChannel};
use crate::error::{ControlError, Result};
use crate::offline::OfflineLatch;
use crate::reporter::ChannelReporter;

/// Default delay between reconnect attempts
pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_secs(1);

/// Runs sessions on behalf of a controller
pub struct Scheduler {
    channel: Arc<dyn ControlChannel>,
    session: EmulationSession,
    method: HookingMethod,
    reconnect_interval: Duration,
    latch: Arc<OfflineLatch>,
    active: Option<SessionHandle>,
}

impl Scheduler {
    /// Create a scheduler whose sessions report over `channel`
    pub fn new(
        channel: Arc<dyn ControlChannel>,
        settings: PlaybackSettings,
        state: Arc<PlaybackState>,
        sink: Arc<dyn SampleSink>,
    ) -> Self {
        let reporter = Arc::new(ChannelReporter::new(Arc::clone(&channel)));
        Self {
            channel,
            session: EmulationSession::new(settings, state, sink, reporter),
            method: HookingMethod::default(),
            reconnect_interval: DEFAULT_RECONNECT_INTERVAL,
            latch: Arc::new(OfflineLatch::new()),
            active: None,
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: HookingMethod) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval = interval;
        self
    }

    /// Share an offline latch, e.g. to observe it from outside
    #[must_use]
    pub fn with_offline_latch(mut self, latch: Arc<OfflineLatch>) -> Self {
        self.latch = latch;
        self
    }

    pub fn state(&self) -> &Arc<PlaybackState> {
        self.session.state()
    }

    pub fn latch(&self) -> &Arc<OfflineLatch> {
        &self.latch
    }

    /// Serve the controller until `cancel` fires
    ///
    /// Returns immediately when the hooking method leaves location delivery
    /// to the platform test provider. On shutdown the active session is
    /// cancelled and joined before this returns.
    pub async fn run(mut self, cancel: CancellationToken) {
        if !self.method.involves_hooking() {
            info!(method = ?self.method, "hooking disabled, scheduler not started");
            return;
        }

        info!(
            transport = self.channel.name(),
            controller = %self.channel.target(),
            reconnect_interval = ?self.reconnect_interval,
            "scheduler started"
        );

        while !cancel.is_cancelled() {
            if let Err(e) = self.serve(&cancel).await {
                if !self.latch.failed(self.channel.target(), &e) {
                    debug!(error = %e, "controller still offline");
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.reconnect_interval) => {}
            }
        }

        self.stop().await;
        info!("scheduler stopped");
    }

    /// One connection: open, resume, then consume commands until it fails
    async fn serve(&mut self, cancel: &CancellationToken) -> Result<()> {
        let channel = Arc::clone(&self.channel);

        let opened = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            opened = channel.open() => opened,
        };
        opened?;

        let current = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            current = channel.current() => current,
        };
        let current = current?;

        if let Some(emulation) = current {
            if self.is_playing() {
                debug!("controller reports an active emulation, already playing it");
            } else if let Err(e) = self.start(emulation) {
                warn!(error = %e, "failed to resume active emulation");
            } else {
                info!("resumed active emulation");
            }
        }

        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                next = channel.next() => next,
            };
            // Only a delivered command closes a failure streak
            if !matches!(&next, Err(e) if e.ends_connection()) {
                self.latch.connected(channel.target());
            }

            match next {
                Ok(Command::Start(emulation)) => {
                    if let Err(e) = self.start(*emulation) {
                        warn!(error = %e, "start command rejected");
                    }
                }
                Ok(Command::Stop) => self.stop().await,
                Err(ControlError::Malformed(reason)) => {
                    warn!(reason = %reason, "dropping malformed command");
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn is_playing(&self) -> bool {
        self.active.as_ref().is_some_and(SessionHandle::is_running)
    }

    fn start(&mut self, emulation: Emulation) -> std::result::Result<(), SessionError> {
        if self.is_playing() {
            return Err(SessionError::AlreadyRunning);
        }

        let handle = self.session.start(emulation)?;
        // A finished handle has nothing left to join
        self.active = Some(handle);
        Ok(())
    }

    /// Cancel and join the active session, if any
    async fn stop(&mut self) {
        let Some(mut handle) = self.active.take() else {
            debug!("stop requested with no active session");
            return;
        };
        handle.cancel().await;
        info!("session cancelled");
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("channel", &self.channel.name())
            .field("target", &self.channel.target())
            .field("method", &self.method)
            .field("reconnect_interval", &self.reconnect_interval)
            .field("playing", &self.is_playing())
            .finish()
    }
}
