//! Minimal frame feed: writes a few synthetic frames to stdout.
//!
//! Run with:
//!   cargo run --example test-pattern > frames.bin
//!
//! Each message is a 4-byte big-endian length followed by a BSON document
//! with `pts` and `frameJpeg` fields.

use std::io::{self, BufWriter};

use bsonframe::codec::{Frame, FrameWriter};

// Smallest byte sequence a JPEG decoder recognises as start/end of image.
const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xD9];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut writer = FrameWriter::new(BufWriter::new(stdout.lock()));

    for i in 0..25i64 {
        let frame = Frame::new(FAKE_JPEG, i * 3_600);
        writer.write_frame(&frame)?;
    }

    eprintln!("Wrote {} frames", writer.frames_written());
    Ok(())
}
