use std::io::{self, ErrorKind, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::codec::{emit_message, encode_message_with_len, Emit};
use crate::error::{EncodeError, Result, WritePhase};
use crate::frame::Frame;
use crate::layout::{checked_document_len, MAX_DOCUMENT_SIZE, PREFIX_SIZE};

/// Configuration for the frame encoder.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Largest document accepted, in bytes. Values above `u32::MAX` are
    /// clamped. Default: `u32::MAX`.
    pub max_document_size: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_document_size: MAX_DOCUMENT_SIZE,
        }
    }
}

/// Encodes frames and writes them to a borrowed sink.
///
/// Each call writes the outer length prefix, the document, and then flushes.
/// The encoder keeps no state between calls and never closes the sink.
#[derive(Debug, Clone, Default)]
pub struct FrameEncoder {
    config: EncoderConfig,
}

impl FrameEncoder {
    /// Create an encoder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder with explicit configuration.
    pub fn with_config(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Current encoder configuration.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Document length for an image of `jpeg_size` bytes under this
    /// encoder's limit.
    pub fn document_len(&self, jpeg_size: usize) -> Result<u32> {
        checked_document_len(jpeg_size, self.config.max_document_size)
    }

    /// Encode `frame` and write it to `sink`, then flush.
    ///
    /// On failure no further writes are issued for this message. The sink may
    /// hold a partial message; whether the stream is still usable is up to
    /// the caller.
    pub fn encode_and_write<W: Write + ?Sized>(&self, frame: &Frame, sink: &mut W) -> Result<()> {
        let document_len = self.document_len(frame.jpeg_size())?;

        let mut out = IoSink::new(sink);
        emit_message(frame, document_len, &mut out)?;
        debug_assert_eq!(out.written, PREFIX_SIZE + document_len as usize);

        flush_sink(out.inner)?;
        trace!(pts = frame.pts, document_len, "frame written");
        Ok(())
    }

    /// Append one encoded message to `dst` without touching any sink.
    pub fn encode_message(&self, frame: &Frame, dst: &mut BytesMut) -> Result<()> {
        let document_len = self.document_len(frame.jpeg_size())?;
        encode_message_with_len(frame, document_len, dst);
        Ok(())
    }
}

/// Encode `frame` with default limits and write it to `sink`, then flush.
pub fn encode_and_write<W: Write + ?Sized>(frame: &Frame, sink: &mut W) -> Result<()> {
    FrameEncoder::new().encode_and_write(frame, sink)
}

struct IoSink<'a, W: ?Sized> {
    inner: &'a mut W,
    written: usize,
}

impl<'a, W: Write + ?Sized> IoSink<'a, W> {
    fn new(inner: &'a mut W) -> Self {
        Self { inner, written: 0 }
    }
}

impl<W: Write + ?Sized> Emit for IoSink<'_, W> {
    type Error = EncodeError;

    fn emit(&mut self, phase: WritePhase, bytes: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < bytes.len() {
            match self.inner.write(&bytes[offset..]) {
                Ok(0) => {
                    return Err(EncodeError::SinkWrite {
                        phase,
                        source: io::Error::from(ErrorKind::WriteZero),
                    })
                }
                Ok(n) => {
                    offset += n;
                    self.written += n;
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(source) => return Err(EncodeError::SinkWrite { phase, source }),
            }
        }
        Ok(())
    }
}

pub(crate) fn flush_sink<W: Write + ?Sized>(sink: &mut W) -> Result<()> {
    loop {
        match sink.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(EncodeError::SinkFlush(err)),
        }
    }
}
