use std::io::Write;

use crate::encoder::{flush_sink, EncoderConfig, FrameEncoder};
use crate::error::Result;
use crate::frame::Frame;

/// Writes complete frame messages to an owned `Write` stream.
///
/// Taking `&mut self` for every write keeps prefix and document of one
/// message back-to-back on the stream.
pub struct FrameWriter<T> {
    inner: T,
    encoder: FrameEncoder,
    frames_written: u64,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, EncoderConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: EncoderConfig) -> Self {
        Self {
            inner,
            encoder: FrameEncoder::with_config(config),
            frames_written: 0,
        }
    }

    /// Encode and write one frame, then flush (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.encoder.encode_and_write(frame, &mut self.inner)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        flush_sink(&mut self.inner)
    }

    /// Number of frames fully written and flushed.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current encoder configuration.
    pub fn config(&self) -> &EncoderConfig {
        self.encoder.config()
    }
}
