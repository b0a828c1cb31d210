use std::io::{self, ErrorKind};

use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::encoder::{EncoderConfig, FrameEncoder};
use crate::error::{EncodeError, Result, WritePhase};
use crate::frame::Frame;
use crate::layout::Layout;

const INITIAL_BUFFER_CAPACITY: usize = 64 * 1024;

/// Writes complete frame messages to an `AsyncWrite` stream.
///
/// Each message is encoded into an internal buffer and written in one pass.
/// Failures report the phase covering the first byte the sink did not take.
pub struct AsyncFrameWriter<T> {
    inner: T,
    buf: BytesMut,
    encoder: FrameEncoder,
    frames_written: u64,
}

impl<T: AsyncWrite + Unpin> AsyncFrameWriter<T> {
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, EncoderConfig::default())
    }

    pub fn with_config(inner: T, config: EncoderConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            encoder: FrameEncoder::with_config(config),
            frames_written: 0,
        }
    }

    /// Encode and write one frame, then flush.
    pub async fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.buf.clear();
        self.encoder.encode_message(frame, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]).await {
                Ok(0) => {
                    return Err(write_error(
                        frame,
                        offset,
                        io::Error::from(ErrorKind::WriteZero),
                    ))
                }
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(write_error(frame, offset, err)),
            }
        }

        self.flush().await?;
        self.frames_written += 1;
        Ok(())
    }

    /// Flush the underlying stream.
    pub async fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush().await {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(EncodeError::SinkFlush(err)),
            }
        }
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

fn write_error(frame: &Frame, offset: usize, source: io::Error) -> EncodeError {
    // The frame already passed the size check, so the layout exists.
    let phase = Layout::new(frame.jpeg_size())
        .ok()
        .and_then(|layout| layout.phase_at(offset))
        .unwrap_or(WritePhase::Framing);
    EncodeError::SinkWrite { phase, source }
}
