//! Length-prefixed bincode frames.
//!
//! Each frame is a 4-byte little-endian payload length followed by the
//! bincode encoding of one message. Frames larger than the configured
//! maximum are refused in both directions.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::core::{Error, Result, DEFAULT_MAX_FRAME_BYTES};

/// Size of the length prefix.
pub const LENGTH_PREFIX_BYTES: usize = 4;

/// Frame encoder/decoder with a size limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameCodec {
    max_frame_bytes: usize,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_BYTES)
    }
}

impl FrameCodec {
    #[must_use]
    pub const fn new(max_frame_bytes: usize) -> Self {
        Self { max_frame_bytes }
    }

    #[must_use]
    pub const fn max_frame_bytes(&self) -> usize {
        self.max_frame_bytes
    }

    fn check_size(&self, size: usize) -> Result<()> {
        if size > self.max_frame_bytes {
            return Err(Error::FrameTooLarge {
                size,
                max: self.max_frame_bytes,
            });
        }
        Ok(())
    }

    /// Encode a message as a complete frame (prefix included).
    pub fn encode<T: Serialize>(&self, message: &T) -> Result<Vec<u8>> {
        let payload = bincode::serialize(message)?;
        self.check_size(payload.len())?;

        let mut frame = Vec::with_capacity(LENGTH_PREFIX_BYTES + payload.len());
        frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        frame.extend_from_slice(&payload);
        Ok(frame)
    }

    /// Decode a frame payload (prefix stripped).
    pub fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T> {
        self.check_size(payload.len())?;
        Ok(bincode::deserialize(payload)?)
    }

    /// Split one complete frame off the front of `buf`.
    ///
    /// Returns the decoded message and the number of bytes consumed, or
    /// `None` if `buf` doesn't hold a whole frame yet.
    pub fn decode_frame<T: DeserializeOwned>(&self, buf: &[u8]) -> Result<Option<(T, usize)>> {
        let Some(prefix) = buf.get(..LENGTH_PREFIX_BYTES) else {
            return Ok(None);
        };
        let mut len_bytes = [0u8; LENGTH_PREFIX_BYTES];
        len_bytes.copy_from_slice(prefix);
        let len = u32::from_le_bytes(len_bytes) as usize;
        self.check_size(len)?;

        let end = LENGTH_PREFIX_BYTES + len;
        match buf.get(LENGTH_PREFIX_BYTES..end) {
            Some(payload) => Ok(Some((self.decode(payload)?, end))),
            None => Ok(None),
        }
    }

    /// Read one frame payload. Returns `None` on a clean end of stream.
    pub async fn read_frame<R: AsyncRead + Unpin>(&self, reader: &mut R) -> Result<Option<Vec<u8>>> {
        let mut len_bytes = [0u8; LENGTH_PREFIX_BYTES];
        match reader.read_exact(&mut len_bytes).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        let len = u32::from_le_bytes(len_bytes) as usize;
        self.check_size(len)?;

        let mut payload = vec![0u8; len];
        reader.read_exact(&mut payload).await?;
        Ok(Some(payload))
    }

    /// Read and decode one message.
    pub async fn read_message<T: DeserializeOwned, R: AsyncRead + Unpin>(
        &self,
        reader: &mut R,
    ) -> Result<Option<T>> {
        match self.read_frame(reader).await? {
            Some(payload) => Ok(Some(self.decode(&payload)?)),
            None => Ok(None),
        }
    }

    /// Encode and write one message, then flush.
    pub async fn write_message<T: Serialize, W: AsyncWrite + Unpin>(
        &self,
        writer: &mut W,
        message: &T,
    ) -> Result<()> {
        let frame = self.encode(message)?;
        writer.write_all(&frame).await?;
        writer.flush().await?;
        Ok(())
    }
}
