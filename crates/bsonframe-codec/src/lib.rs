//! Length-prefixed BSON framing for timestamped JPEG video frames.
//!
//! Every message written to a sink is:
//! - A 4-byte big-endian document length, for stream framing
//! - A two-field BSON document: `pts` (int64) then `frameJpeg` (generic binary)
//!
//! The document starts with the same length in little-endian, as BSON
//! requires. Readers split the stream on the outer prefix and hand each
//! document to a BSON parser.
//!
//! The `pts` value is written in host byte order. Readers on a host with a
//! different endianness will see a byte-swapped timestamp.

#[cfg(feature = "async")]
pub mod async_writer;
pub mod codec;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod layout;
pub mod writer;

#[cfg(feature = "async")]
pub use async_writer::AsyncFrameWriter;
pub use codec::encode_message;
pub use encoder::{encode_and_write, EncoderConfig, FrameEncoder};
pub use error::{EncodeError, Result, WritePhase};
pub use frame::Frame;
pub use layout::{
    document_len, Field, Layout, Span, DOCUMENT_OVERHEAD, FIELDS, MAX_DOCUMENT_SIZE,
    MAX_JPEG_SIZE, PREFIX_SIZE,
};
pub use writer::FrameWriter;
