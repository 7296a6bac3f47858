//! Drift Control
//!
//! Connects a device to its controller and plays the emulations it sends.
//!
//! # Architecture
//!
//! ```text
//!   controller ──commands──► ControlChannel ──► Scheduler ──► EmulationSession
//!        ▲                        ▲                                  │
//!        └──────── reports ───────┴──────── ChannelReporter ◄────────┘
//! ```
//!
//! | Transport | Type            | Commands                 |
//! |-----------|-----------------|--------------------------|
//! | `http`    | [`HttpChannel`] | long-poll `GET next/{id}` |
//! | `socket`  | [`SocketChannel`] | pushed length-prefixed frames |
//!
//! # Usage
//!
//! ```ignore
//! use drift_control::{Scheduler, SessionId, channel_from_config};
//!
//! let channel = channel_from_config(&config.control, SessionId::new())?;
//! let scheduler = Scheduler::new(channel, settings, state, sink)
//!     .with_method(config.playback.method)
//!     .with_reconnect_interval(config.control.reconnect_interval);
//!
//! scheduler.run(cancel).await;
//! ```

pub mod channel;
mod error;
mod offline;
mod reporter;
mod scheduler;
mod session_id;

pub use channel::{
    Command, ControlChannel, Frame, FrameReader, HttpChannel, SocketChannel, channel_from_config,
};
pub use error::{ControlError, Result};
pub use offline::OfflineLatch;
pub use reporter::ChannelReporter;
pub use scheduler::{DEFAULT_RECONNECT_INTERVAL, Scheduler};
pub use session_id::SessionId;
