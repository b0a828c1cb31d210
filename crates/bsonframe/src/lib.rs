//! Stream timestamped JPEG frames as length-prefixed BSON messages.
//!
//! bsonframe writes one message per video frame to any byte sink, typically
//! a pipe read by a process that demultiplexes a live camera feed.
//!
//! # Crate Structure
//!
//! - [`codec`]: Frame encoding, message layout and writers
//!
//! The `bsonframe` binary (behind the `cli` feature) replays JPEG files as a
//! frame feed on stdout and prints the message layout.

/// Re-export codec types.
pub mod codec {
    pub use bsonframe_codec::*;
}
