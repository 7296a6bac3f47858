//! Length-prefixed JSON frames
//!
//! Wire format: `[u32 big-endian length][JSON payload]`, payload at most
//! [`MAX_FRAME_SIZE`] bytes. The payload is a [`Frame`] tagged by `type`.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use drift_model::{Emulation, EmulationInfo, Intermediate};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{ControlError, Result};

/// Length prefix size in bytes
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Maximum payload size (4 MiB)
pub const MAX_FRAME_SIZE: usize = 4 * 1024 * 1024;

/// Initial read buffer capacity
const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Messages exchanged over the socket transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    /// Client → server, first frame on every connection
    Hello { id: String },
    /// Server → client
    Start { emulation: Box<Emulation> },
    /// Server → client
    Stop,
    /// Client → server
    Running { info: EmulationInfo },
    /// Client → server
    Stopped,
    /// Client → server
    Intermediate { report: Intermediate },
}

/// Serialize `frame` with its length prefix
pub fn encode_frame(frame: &Frame) -> Result<Bytes> {
    let payload = serde_json::to_vec(frame)?;
    if payload.len() > MAX_FRAME_SIZE {
        return Err(ControlError::Frame {
            size: payload.len(),
            limit: MAX_FRAME_SIZE,
        });
    }

    let mut buf = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
    buf.put_u32(payload.len() as u32);
    buf.put_slice(&payload);
    Ok(buf.freeze())
}

/// Write one frame
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, frame: &Frame) -> Result<()> {
    let bytes = encode_frame(frame)?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

/// Payload length of the next complete frame in `buf`
///
/// Returns `Ok(None)` while more data is needed.
fn peek_frame_len(buf: &BytesMut) -> Result<Option<usize>> {
    if buf.len() < LENGTH_PREFIX_SIZE {
        return Ok(None);
    }

    let len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    if len > MAX_FRAME_SIZE {
        return Err(ControlError::Frame {
            size: len,
            limit: MAX_FRAME_SIZE,
        });
    }

    if buf.len() < LENGTH_PREFIX_SIZE + len {
        return Ok(None);
    }
    Ok(Some(len))
}

/// Buffered frame reader over a byte stream
#[derive(Debug)]
pub struct FrameReader<R> {
    inner: R,
    buf: BytesMut,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(READ_BUFFER_SIZE),
        }
    }

    /// Read the next frame
    ///
    /// A payload that is not a valid [`Frame`] is consumed and reported as
    /// `Malformed`; the stream stays aligned for the next call. End of stream
    /// is `Closed`.
    pub async fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some(len) = peek_frame_len(&self.buf)? {
                self.buf.advance(LENGTH_PREFIX_SIZE);
                let payload = self.buf.split_to(len);
                return Ok(serde_json::from_slice(&payload)?);
            }

            if self.inner.read_buf(&mut self.buf).await? == 0 {
                return Err(ControlError::Closed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_model::{CoordinateSystem, Point, Trace};

    fn emulation() -> Emulation {
        Emulation::new(
            Trace::new(
                vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0)],
                CoordinateSystem::Wgs84,
            ),
            1.0,
        )
    }

    fn raw(payload: &[u8]) -> Vec<u8> {
        let mut bytes = (payload.len() as u32).to_be_bytes().to_vec();
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_encode_prefix() {
        let bytes = encode_frame(&Frame::Stop).unwrap();
        let payload = br#"{"type":"stop"}"#;
        assert_eq!(&bytes[..4], &(payload.len() as u32).to_be_bytes());
        assert_eq!(&bytes[4..], payload);
    }

    #[test]
    fn test_peek_waits_for_complete_frame() {
        let bytes = encode_frame(&Frame::Stopped).unwrap();

        let mut buf = BytesMut::new();
        buf.extend_from_slice(&bytes[..2]);
        assert_eq!(peek_frame_len(&buf).unwrap(), None);

        buf.extend_from_slice(&bytes[2..bytes.len() - 1]);
        assert_eq!(peek_frame_len(&buf).unwrap(), None);

        buf.extend_from_slice(&bytes[bytes.len() - 1..]);
        assert_eq!(peek_frame_len(&buf).unwrap(), Some(bytes.len() - 4));
    }

    #[test]
    fn test_peek_rejects_oversized() {
        let mut buf = BytesMut::new();
        buf.put_u32(MAX_FRAME_SIZE as u32 + 1);
        assert!(matches!(
            peek_frame_len(&buf),
            Err(ControlError::Frame { .. })
        ));
    }

    #[tokio::test]
    async fn test_reads_consecutive_frames_across_chunks() {
        let mut wire = Vec::new();
        wire.extend_from_slice(&encode_frame(&Frame::Hello { id: "abc".into() }).unwrap());
        wire.extend_from_slice(
            &encode_frame(&Frame::Start {
                emulation: Box::new(emulation()),
            })
            .unwrap(),
        );
        wire.extend_from_slice(&encode_frame(&Frame::Stop).unwrap());

        // Deliver in 3-byte chunks
        let (mut client, server) = tokio::io::duplex(3);
        let writer = tokio::spawn(async move {
            client.write_all(&wire).await.unwrap();
        });

        let mut reader = FrameReader::new(server);
        assert_eq!(
            reader.read_frame().await.unwrap(),
            Frame::Hello { id: "abc".into() }
        );
        assert_eq!(
            reader.read_frame().await.unwrap(),
            Frame::Start {
                emulation: Box::new(emulation())
            }
        );
        assert_eq!(reader.read_frame().await.unwrap(), Frame::Stop);

        writer.await.unwrap();
        assert!(matches!(reader.read_frame().await, Err(ControlError::Closed)));
    }

    #[tokio::test]
    async fn test_malformed_payload_keeps_stream_aligned() {
        let mut wire = raw(br#"{"type":"teleport"}"#);
        wire.extend_from_slice(&encode_frame(&Frame::Stop).unwrap());

        let mut reader = FrameReader::new(&wire[..]);
        assert!(matches!(
            reader.read_frame().await,
            Err(ControlError::Malformed(_))
        ));
        assert_eq!(reader.read_frame().await.unwrap(), Frame::Stop);
    }

    #[tokio::test]
    async fn test_write_frame() {
        let mut out = Vec::new();
        write_frame(&mut out, &Frame::Stopped).await.unwrap();

        let mut reader = FrameReader::new(&out[..]);
        assert_eq!(reader.read_frame().await.unwrap(), Frame::Stopped);
    }
}
