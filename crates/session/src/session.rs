//! Emulation sessions
//!
//! A session plays one [`Emulation`] for its repeat count. Each iteration
//! restarts the shared clock, spawns the active drivers and joins all of them
//! before the next iteration begins, so no two iterations ever write the
//! shared state concurrently.
//!
//! ```text
//! start ──► running report
//!             │
//!             ├─► iteration 1: [trace] [steps] [motion] [cell] ─► join
//!             ├─► iteration 2: ...                              ─► join
//!             │
//!           stopped report ◄── cancel / repeats exhausted
//! ```

use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Duration;

use drift_interp::{MotionInterpolator, TraceInterpolator, TracePosition};
use drift_model::{Emulation, EmulationInfo};
use parking_lot::Mutex;
use rand::Rng;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::clock::PlaybackClock;
use crate::driver;
use crate::error::Result;
use crate::reporter::StatusReporter;
use crate::settings::PlaybackSettings;
use crate::sink::SampleSink;
use crate::state::{PlaybackState, SessionStatus};

/// Range the synthetic step counter is seeded from
const STEP_SEED_RANGE: Range<u64> = 2000..7000;

/// Everything the drivers of one session share
pub(crate) struct SessionContext {
    pub emulation: Emulation,
    pub settings: PlaybackSettings,
    pub clock: PlaybackClock,
    pub state: Arc<PlaybackState>,
    pub sink: Arc<dyn SampleSink>,
    pub reporter: Arc<dyn StatusReporter>,
    pub token: CancellationToken,
    pub trace: TraceInterpolator,
    /// Last trace position, kept across iterations
    pub trace_resume: Mutex<Option<TracePosition>>,
    /// Present iff non-step sensors are played back
    pub motion: Option<MotionInterpolator>,
    /// Present iff step sensors are played back
    pub steps: Option<AtomicU64>,
}

impl SessionContext {
    /// Loop-head guard shared by every driver
    pub fn is_live(&self) -> bool {
        self.state.is_hooking() && !self.token.is_cancelled() && self.clock.progress() <= 1.0
    }

    /// Sleep for `duration`; false if the session was cancelled meanwhile
    pub async fn pause(&self, duration: Duration) -> bool {
        tokio::select! {
            _ = self.token.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }
}

/// Starts sessions against a fixed environment
///
/// Holds what outlives a single playback: settings, the shared state, the
/// sink and the reporter.
pub struct EmulationSession {
    settings: PlaybackSettings,
    state: Arc<PlaybackState>,
    sink: Arc<dyn SampleSink>,
    reporter: Arc<dyn StatusReporter>,
}

impl EmulationSession {
    pub fn new(
        settings: PlaybackSettings,
        state: Arc<PlaybackState>,
        sink: Arc<dyn SampleSink>,
        reporter: Arc<dyn StatusReporter>,
    ) -> Self {
        Self {
            settings,
            state,
            sink,
            reporter,
        }
    }

    pub fn state(&self) -> &Arc<PlaybackState> {
        &self.state
    }

    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    /// Validate `emulation` and start playing it on the current runtime
    ///
    /// The trace is salted once here and reused by every iteration.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Invalid` if the emulation violates its
    /// invariants or the configured salt is unusable.
    pub fn start(&self, emulation: Emulation) -> Result<SessionHandle> {
        emulation.validate()?;

        let mut rng = rand::rng();
        let salted = emulation.trace.salted(&mut rng, self.settings.salt)?;
        let trace = TraceInterpolator::new(&salted, self.settings.projector.as_ref());

        let length = trace.length();
        let duration = length / emulation.velocity;

        let motion = emulation
            .motion
            .active()
            .filter(|m| m.involves_non_steps())
            .map(|m| MotionInterpolator::new(m.valid_part()))
            .filter(|interp| !interp.is_empty());
        let steps = emulation
            .motion
            .active()
            .filter(|m| m.involves_steps())
            .map(|_| AtomicU64::new(rng.random_range(STEP_SEED_RANGE)));

        let info = EmulationInfo {
            duration,
            length,
            package: self.settings.package.clone(),
        };

        info!(
            points = salted.points.len(),
            length,
            duration,
            repeat = emulation.repeat,
            motion = motion.is_some(),
            steps = steps.is_some(),
            cells = emulation.cells.active().is_some(),
            projector = self.settings.projector.name(),
            "starting session"
        );

        self.state.set_satellites(emulation.satellite_count);
        self.state.set_hooking(true);
        self.state.set_status(SessionStatus::Running);

        let token = CancellationToken::new();
        let ctx = Arc::new(SessionContext {
            emulation,
            settings: self.settings.clone(),
            clock: PlaybackClock::new(duration),
            state: Arc::clone(&self.state),
            sink: Arc::clone(&self.sink),
            reporter: Arc::clone(&self.reporter),
            token: token.clone(),
            trace,
            trace_resume: Mutex::new(None),
            motion,
            steps,
        });

        let task = tokio::spawn(run(ctx, info.clone()));

        Ok(SessionHandle {
            token,
            state: Arc::clone(&self.state),
            task: Some(task),
            info,
        })
    }
}

/// Owner's handle on a playing session
#[derive(Debug)]
pub struct SessionHandle {
    token: CancellationToken,
    state: Arc<PlaybackState>,
    task: Option<JoinHandle<()>>,
    info: EmulationInfo,
}

impl SessionHandle {
    pub fn info(&self) -> &EmulationInfo {
        &self.info
    }

    /// Whether the session task is still playing
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop playback and wait for every driver to exit
    ///
    /// Once this returns no further sample is published. Idempotent.
    pub async fn cancel(&mut self) {
        self.state.set_hooking(false);
        self.token.cancel();
        self.join().await;
    }

    /// Wait for the session to finish on its own
    pub async fn wait(&mut self) {
        self.join().await;
    }

    async fn join(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        if let Err(e) = task.await {
            error!(error = %e, "session task failed");
            self.state.set_hooking(false);
            self.state.set_status(SessionStatus::Stopped);
        }
    }
}

async fn run(ctx: Arc<SessionContext>, info: EmulationInfo) {
    ctx.reporter.running(&info).await;

    for iteration in 0..ctx.emulation.repeat {
        if !ctx.state.is_hooking() || ctx.token.is_cancelled() {
            break;
        }

        ctx.clock.restart();
        debug!(iteration, "iteration started");

        let mut drivers = JoinSet::new();
        drivers.spawn(driver::trace::run(Arc::clone(&ctx)));
        if ctx.steps.is_some() {
            drivers.spawn(driver::steps::run(Arc::clone(&ctx)));
        }
        if ctx.motion.is_some() {
            drivers.spawn(driver::motion::run(Arc::clone(&ctx)));
        }
        if ctx
            .emulation
            .cells
            .active()
            .is_some_and(|timeline| !timeline.moments.is_empty())
        {
            drivers.spawn(driver::cell::run(Arc::clone(&ctx)));
        }

        while let Some(result) = drivers.join_next().await {
            if let Err(e) = result {
                error!(iteration, error = %e, "driver failed");
            }
        }
    }

    ctx.state.set_hooking(false);
    ctx.state.set_status(SessionStatus::Stopped);
    ctx.reporter.stopped().await;

    info!(cancelled = ctx.token.is_cancelled(), "session stopped");
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
