//! Persistent socket channel
//!
//! One TCP connection per open. The client announces itself with
//! `Hello { id }`; the controller pushes `Start`/`Stop` frames, including
//! `Start` for an emulation that was already active when the client
//! connected. Reports travel as frames on the same connection.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use drift_config::ControlConfig;
use drift_model::{Emulation, EmulationInfo, Intermediate};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, trace};

use super::frame::{Frame, FrameReader, write_frame};
use super::{Command, ControlChannel};
use crate::error::{ControlError, Result};
use crate::session_id::SessionId;

/// Channel to a socket controller
#[derive(Debug)]
pub struct SocketChannel {
    addr: String,
    id: SessionId,
    request_timeout: Duration,
    reader: Mutex<Option<FrameReader<OwnedReadHalf>>>,
    writer: Mutex<Option<OwnedWriteHalf>>,
}

impl SocketChannel {
    pub fn new(config: &ControlConfig, id: SessionId) -> Self {
        Self {
            addr: config.addr(),
            id,
            request_timeout: config.request_timeout,
            reader: Mutex::new(None),
            writer: Mutex::new(None),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Send one client frame, bounded by the request timeout
    async fn send(&self, frame: &Frame) -> Result<()> {
        let mut writer = self.writer.lock().await;
        let Some(stream) = writer.as_mut() else {
            return Err(ControlError::Closed);
        };

        match timeout(self.request_timeout, write_frame(stream, frame)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                *writer = None;
                Err(e)
            }
            Err(_) => {
                *writer = None;
                Err(io::Error::new(io::ErrorKind::TimedOut, "write timed out").into())
            }
        }
    }
}

#[async_trait]
impl ControlChannel for SocketChannel {
    fn name(&self) -> &'static str {
        "socket"
    }

    fn target(&self) -> &str {
        &self.addr
    }

    async fn open(&self) -> Result<()> {
        let stream = match timeout(self.request_timeout, TcpStream::connect(&self.addr)).await {
            Ok(stream) => stream?,
            Err(_) => {
                return Err(io::Error::new(io::ErrorKind::TimedOut, "connect timed out").into());
            }
        };

        if let Err(e) = stream.set_nodelay(true) {
            debug!(
                addr = %self.addr,
                error = %e,
                "failed to set TCP_NODELAY, continuing with default buffering"
            );
        }

        let (read_half, write_half) = stream.into_split();
        *self.reader.lock().await = Some(FrameReader::new(read_half));
        *self.writer.lock().await = Some(write_half);

        self.send(&Frame::Hello {
            id: self.id.to_string(),
        })
        .await?;

        debug!(addr = %self.addr, id = %self.id, "connected to controller");
        Ok(())
    }

    /// Always `None`: the controller pushes the active emulation after Hello
    async fn current(&self) -> Result<Option<Emulation>> {
        Ok(None)
    }

    async fn next(&self) -> Result<Command> {
        let mut reader = self.reader.lock().await;
        let Some(frames) = reader.as_mut() else {
            return Err(ControlError::Closed);
        };

        let frame = match frames.read_frame().await {
            Ok(frame) => frame,
            Err(e) => {
                if e.ends_connection() {
                    *reader = None;
                }
                return Err(e);
            }
        };

        trace!(?frame, "frame received");
        match frame {
            Frame::Start { emulation } => Ok(Command::Start(emulation)),
            Frame::Stop => Ok(Command::Stop),
            other => Err(ControlError::Malformed(format!(
                "unexpected frame from controller: {other:?}"
            ))),
        }
    }

    async fn report_running(&self, info: &EmulationInfo) -> Result<()> {
        self.send(&Frame::Running { info: info.clone() }).await
    }

    async fn report_stopped(&self) -> Result<()> {
        self.send(&Frame::Stopped).await
    }

    async fn report_intermediate(&self, report: &Intermediate) -> Result<()> {
        self.send(&Frame::Intermediate {
            report: report.clone(),
        })
        .await
    }
}
