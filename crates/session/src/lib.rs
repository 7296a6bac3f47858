//! Drift Session
//!
//! Plays an [`Emulation`](drift_model::Emulation) against the wall clock.
//!
//! # Architecture
//!
//! ```text
//!                      ┌──────────────────┐
//!   Emulation ───────► │ EmulationSession │ ──► SessionHandle (cancel / wait)
//!                      └────────┬─────────┘
//!                               │ per repeat iteration
//!        ┌──────────────┬───────┴──────┬──────────────┐
//!        ▼              ▼              ▼              ▼
//!   ┌─────────┐    ┌─────────┐    ┌─────────┐    ┌─────────┐
//!   │  trace  │    │  steps  │    │ motion  │    │  cell   │
//!   └────┬────┘    └────┬────┘    └────┬────┘    └────┬────┘
//!        │              └──────┬───────┘              │
//!        ▼                     ▼                      ▼
//!   SampleSink::publish_position / publish_motion / publish_cell
//! ```
//!
//! All drivers read one [`PlaybackClock`]; the position driver also writes
//! the current location into [`PlaybackState`] and sends progress through
//! the [`StatusReporter`].

mod clock;
mod driver;
mod error;
mod reporter;
mod session;
mod settings;
mod sink;
mod state;

pub use clock::PlaybackClock;
pub use error::{Result, SessionError, SinkError};
pub use reporter::{NoopReporter, StatusReporter};
pub use session::{EmulationSession, SessionHandle};
pub use settings::PlaybackSettings;
pub use sink::{FanoutSink, LogSink, SampleSink, SubscriberRegistry};
pub use state::{PlaybackState, SessionStatus};
