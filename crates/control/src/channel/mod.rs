//! Controller channels
//!
//! The controller issues start/stop commands and receives reports. Two
//! transports implement the same contract:
//!
//! | Transport | Commands                         | Reports                      |
//! |-----------|----------------------------------|------------------------------|
//! | HTTP      | long-poll `GET next/{id}`        | `POST state/…`, `intermediate/…` |
//! | Socket    | server-pushed `Start`/`Stop`     | client frames on the same socket |
//!
//! Channels are shared between the scheduler loop (commands) and the
//! session's reporter (reports), so every method takes `&self`.

mod frame;
mod http;
mod socket;

use std::sync::Arc;

use async_trait::async_trait;
use drift_config::{ControlConfig, Transport};
use drift_model::{Emulation, EmulationInfo, Intermediate};

use crate::error::Result;
use crate::session_id::SessionId;

pub use frame::{Frame, FrameReader, LENGTH_PREFIX_SIZE, MAX_FRAME_SIZE, encode_frame, write_frame};
pub use http::HttpChannel;
pub use socket::SocketChannel;

/// A command from the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Play this emulation
    Start(Box<Emulation>),
    /// Cancel whatever is playing
    Stop,
}

/// Connection to one controller
#[async_trait]
pub trait ControlChannel: Send + Sync {
    /// Transport name for logging
    fn name(&self) -> &'static str;

    /// Controller address for logging
    fn target(&self) -> &str;

    /// (Re)establish the connection
    async fn open(&self) -> Result<()>;

    /// The emulation the controller considers active, if any
    async fn current(&self) -> Result<Option<Emulation>>;

    /// Wait for the next command
    async fn next(&self) -> Result<Command>;

    async fn report_running(&self, info: &EmulationInfo) -> Result<()>;

    async fn report_stopped(&self) -> Result<()>;

    async fn report_intermediate(&self, report: &Intermediate) -> Result<()>;
}

/// Build the channel selected by `config.transport`
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn channel_from_config(
    config: &ControlConfig,
    id: SessionId,
) -> Result<Arc<dyn ControlChannel>> {
    let channel: Arc<dyn ControlChannel> = match config.transport {
        Transport::Http => Arc::new(HttpChannel::new(config, id)?),
        Transport::Socket => Arc::new(SocketChannel::new(config, id)),
    };
    Ok(channel)
}
