//! Async frame feed: writes synthetic frames to stdout from a tokio task.
//!
//! Run with:
//!   cargo run --example async-feed --features async | hexdump -C | head

use std::time::Duration;

use bsonframe::codec::{AsyncFrameWriter, Frame};

const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xD9];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = AsyncFrameWriter::new(tokio::io::stdout());
    let mut ticker = tokio::time::interval(Duration::from_millis(40));

    for i in 0..10i64 {
        ticker.tick().await;
        writer.write_frame(&Frame::new(FAKE_JPEG, i * 3_600)).await?;
    }

    eprintln!("Wrote {} frames", writer.frames_written());
    Ok(())
}
