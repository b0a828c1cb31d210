use std::fmt;
use std::io;

/// The part of a message that was being written when a sink failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WritePhase {
    /// Outer big-endian length prefix.
    Framing,
    /// Little-endian document length at the start of the document.
    DocumentHeader,
    /// Tag byte, field name and its NUL terminator.
    FieldName,
    /// Fixed-size field value: the timestamp, or the binary length and subtype.
    FieldValue,
    /// Raw image bytes.
    Payload,
    /// Trailing document NUL.
    Terminator,
}

impl WritePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            WritePhase::Framing => "framing",
            WritePhase::DocumentHeader => "document header",
            WritePhase::FieldName => "field name",
            WritePhase::FieldValue => "field value",
            WritePhase::Payload => "payload",
            WritePhase::Terminator => "terminator",
        }
    }
}

impl fmt::Display for WritePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while encoding a frame message.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The document length for this image does not fit the configured limit.
    /// Nothing was written to the sink.
    #[error("frame too large ({jpeg_size} byte image, document max {max})")]
    FrameTooLarge { jpeg_size: usize, max: usize },

    /// A write to the sink failed or stopped making progress.
    #[error("sink write failed during {phase}: {source}")]
    SinkWrite {
        phase: WritePhase,
        #[source]
        source: io::Error,
    },

    /// Every byte was handed to the sink but flushing it failed.
    #[error("sink flush failed: {0}")]
    SinkFlush(#[source] io::Error),
}

impl EncodeError {
    /// Phase in progress when a write failed. `None` for size and flush errors.
    pub fn phase(&self) -> Option<WritePhase> {
        match self {
            EncodeError::SinkWrite { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// Underlying I/O error, if the sink produced one.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            EncodeError::SinkWrite { source, .. } | EncodeError::SinkFlush(source) => Some(source),
            EncodeError::FrameTooLarge { .. } => None,
        }
    }

    /// True when the reader on the other end of the sink has gone away.
    pub fn is_broken_pipe(&self) -> bool {
        self.io_error()
            .is_some_and(|err| err.kind() == io::ErrorKind::BrokenPipe)
    }
}

pub type Result<T> = std::result::Result<T, EncodeError>;
