//! Message layout: the field table shared by size computation and encoding.
//!
//! ```text
//! ┌────────────┬────────────┬──────────────────────┬──────────────────────────────────┬──────┐
//! │ Frame len  │ Doc len    │ 0x12 "pts\0" i64     │ 0x05 "frameJpeg\0" len 0x00 data │ 0x00 │
//! │ (4B BE)    │ (4B LE)    │ (1 + 4 + 8 bytes)    │ (1 + 10 + 4 + 1 + N bytes)       │      │
//! └────────────┴────────────┴──────────────────────┴──────────────────────────────────┴──────┘
//! ```
//!
//! Both length fields carry the same value. The outer one is for stream
//! framing, the inner one is the document's own BSON length.

use crate::error::{EncodeError, Result, WritePhase};

/// Outer frame length prefix (big-endian).
pub const PREFIX_SIZE: usize = 4;

/// Document length field at the start of the document (little-endian).
pub const DOCUMENT_LENGTH_SIZE: usize = 4;

/// Trailing NUL that closes the document.
pub const TERMINATOR_SIZE: usize = 1;

/// BSON element type for a 64-bit signed integer.
pub const TAG_INT64: u8 = 0x12;

/// BSON element type for binary data.
pub const TAG_BINARY: u8 = 0x05;

/// BSON binary subtype for generic, uninterpreted bytes.
pub const SUBTYPE_GENERIC: u8 = 0x00;

/// Largest document a 4-byte length field can describe.
pub const MAX_DOCUMENT_SIZE: usize = u32::MAX as usize;

/// One element of the frame document, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Presentation timestamp, int64.
    Pts,
    /// JPEG image, generic binary.
    FrameJpeg,
}

/// Document elements in the order they are written.
pub const FIELDS: [Field; 2] = [Field::Pts, Field::FrameJpeg];

impl Field {
    /// Element name as written on the wire (without the NUL).
    pub const fn name(self) -> &'static str {
        match self {
            Field::Pts => "pts",
            Field::FrameJpeg => "frameJpeg",
        }
    }

    /// BSON element type tag.
    pub const fn tag(self) -> u8 {
        match self {
            Field::Pts => TAG_INT64,
            Field::FrameJpeg => TAG_BINARY,
        }
    }

    /// Tag byte + name + NUL.
    pub const fn name_len(self) -> usize {
        1 + self.name().len() + 1
    }

    /// Fixed-size bytes after the name: the i64 value, or the binary
    /// length plus subtype byte.
    pub const fn value_len(self) -> usize {
        match self {
            Field::Pts => 8,
            Field::FrameJpeg => 4 + 1,
        }
    }

    /// Encoded bytes that do not depend on the frame contents.
    pub const fn fixed_len(self) -> usize {
        self.name_len() + self.value_len()
    }

    /// Variable-size bytes that follow the fixed part.
    pub const fn payload_len(self, jpeg_size: usize) -> usize {
        match self {
            Field::Pts => 0,
            Field::FrameJpeg => jpeg_size,
        }
    }

    fn name_label(self) -> &'static str {
        match self {
            Field::Pts => "pts name",
            Field::FrameJpeg => "frameJpeg name",
        }
    }

    fn value_label(self) -> &'static str {
        match self {
            Field::Pts => "pts value",
            Field::FrameJpeg => "frameJpeg length + subtype",
        }
    }
}

/// Document bytes that every frame carries regardless of image size.
pub const DOCUMENT_OVERHEAD: usize = document_overhead();

const fn document_overhead() -> usize {
    let mut total = DOCUMENT_LENGTH_SIZE + TERMINATOR_SIZE;
    let mut i = 0;
    while i < FIELDS.len() {
        total += FIELDS[i].fixed_len();
        i += 1;
    }
    total
}

const _: () = assert!(DOCUMENT_OVERHEAD == 34);

/// Largest image that still yields a representable document length.
pub const MAX_JPEG_SIZE: usize = MAX_DOCUMENT_SIZE - DOCUMENT_OVERHEAD;

/// Compute the document length for an image of `jpeg_size` bytes.
///
/// This is the value written to both length fields. The outer prefix is not
/// included.
pub fn document_len(jpeg_size: usize) -> Result<u32> {
    checked_document_len(jpeg_size, MAX_DOCUMENT_SIZE)
}

pub(crate) fn checked_document_len(jpeg_size: usize, max: usize) -> Result<u32> {
    let max = max.min(MAX_DOCUMENT_SIZE);
    let too_large = || EncodeError::FrameTooLarge { jpeg_size, max };
    let len = FIELDS
        .iter()
        .map(|field| field.payload_len(jpeg_size))
        .try_fold(DOCUMENT_OVERHEAD, usize::checked_add)
        .ok_or_else(too_large)?;
    if len > max {
        return Err(too_large());
    }
    u32::try_from(len).map_err(|_| too_large())
}

/// A contiguous run of bytes within one encoded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub phase: WritePhase,
    pub label: &'static str,
    pub offset: usize,
    pub len: usize,
}

impl Span {
    /// Offset one past the last byte of the span.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Byte-level layout of one encoded message, prefix included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    jpeg_size: usize,
    document_len: u32,
    message_len: usize,
    spans: Vec<Span>,
}

impl Layout {
    /// Lay out a message for an image of `jpeg_size` bytes.
    ///
    /// Fails when the document length does not fit in `u32`, or when the
    /// whole message does not fit in `usize` (32-bit targets).
    pub fn new(jpeg_size: usize) -> Result<Self> {
        let document_len = document_len(jpeg_size)?;
        let message_len = usize::try_from(document_len)
            .ok()
            .and_then(|len| len.checked_add(PREFIX_SIZE))
            .ok_or(EncodeError::FrameTooLarge {
                jpeg_size,
                max: MAX_DOCUMENT_SIZE,
            })?;

        let mut spans = Vec::with_capacity(3 + FIELDS.len() * 3);
        let mut offset = 0usize;
        let mut push = |phase, label, len| {
            spans.push(Span {
                phase,
                label,
                offset,
                len,
            });
            offset += len;
        };

        push(WritePhase::Framing, "frame length", PREFIX_SIZE);
        push(
            WritePhase::DocumentHeader,
            "document length",
            DOCUMENT_LENGTH_SIZE,
        );
        for field in FIELDS {
            push(WritePhase::FieldName, field.name_label(), field.name_len());
            push(WritePhase::FieldValue, field.value_label(), field.value_len());
            if field == Field::FrameJpeg {
                push(
                    WritePhase::Payload,
                    "frameJpeg data",
                    field.payload_len(jpeg_size),
                );
            }
        }
        push(WritePhase::Terminator, "terminator", TERMINATOR_SIZE);

        debug_assert_eq!(offset, message_len);

        Ok(Self {
            jpeg_size,
            document_len,
            message_len,
            spans,
        })
    }

    pub fn jpeg_size(&self) -> usize {
        self.jpeg_size
    }

    /// Value carried by both length fields.
    pub fn document_len(&self) -> u32 {
        self.document_len
    }

    /// Total bytes on the wire: prefix plus document.
    pub fn message_len(&self) -> usize {
        self.message_len
    }

    /// Offset of the first image byte within the message.
    pub fn payload_offset(&self) -> usize {
        self.spans
            .iter()
            .find(|span| span.phase == WritePhase::Payload)
            .map_or(0, |span| span.offset)
    }

    /// Spans covering every byte of the message, in wire order.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Phase that writes the message byte at `offset`.
    pub fn phase_at(&self, offset: usize) -> Option<WritePhase> {
        self.spans
            .iter()
            .find(|span| offset >= span.offset && offset < span.end())
            .map(|span| span.phase)
    }
}
