#![cfg(all(unix, feature = "cli"))]

use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "bsonframe-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

/// Split a frame stream into (pts, jpeg) pairs.
fn split_frames(mut wire: &[u8]) -> Vec<(i64, Vec<u8>)> {
    let mut frames = Vec::new();
    while !wire.is_empty() {
        let outer = u32::from_be_bytes(wire[..4].try_into().unwrap()) as usize;
        let doc = &wire[4..4 + outer];
        let inner = u32::from_le_bytes(doc[..4].try_into().unwrap()) as usize;
        assert_eq!(outer, inner, "length fields disagree");

        assert_eq!(&doc[4..9], b"\x12pts\x00");
        let pts = i64::from_ne_bytes(doc[9..17].try_into().unwrap());
        assert_eq!(&doc[17..28], b"\x05frameJpeg\x00");
        let jpeg_len = u32::from_le_bytes(doc[28..32].try_into().unwrap()) as usize;
        assert_eq!(doc[32], 0x00);
        let jpeg = doc[33..33 + jpeg_len].to_vec();
        assert_eq!(doc[33 + jpeg_len], 0x00);
        assert_eq!(33 + jpeg_len + 1, outer);

        frames.push((pts, jpeg));
        wire = &wire[4 + outer..];
    }
    frames
}

#[test]
fn emit_writes_one_message_per_file() {
    let dir = unique_temp_dir("emit");
    let first = dir.join("first.jpg");
    let second = dir.join("second.jpg");
    std::fs::write(&first, [0xFFu8, 0xD8, 0xFF, 0xD9]).expect("write first");
    std::fs::write(&second, [0xFFu8, 0xD8, 0x0A, 0x0A, 0xFF, 0xD9]).expect("write second");

    let output = Command::new(env!("CARGO_BIN_EXE_bsonframe"))
        .arg("--log-level")
        .arg("error")
        .arg("emit")
        .arg(&first)
        .arg(&second)
        .arg(&first)
        .arg("--pts-start")
        .arg("1000")
        .arg("--pts-step")
        .arg("40")
        .output()
        .expect("emit should run");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let frames = split_frames(&output.stdout);
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0], (1000, vec![0xFF, 0xD8, 0xFF, 0xD9]));
    assert_eq!(frames[1], (1040, vec![0xFF, 0xD8, 0x0A, 0x0A, 0xFF, 0xD9]));
    assert_eq!(frames[2].0, 1080);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn emit_to_output_file() {
    let dir = unique_temp_dir("emit-file");
    let image = dir.join("empty.jpg");
    let target = dir.join("frames.bin");
    std::fs::write(&image, b"").expect("write image");

    let status = Command::new(env!("CARGO_BIN_EXE_bsonframe"))
        .arg("emit")
        .arg(&image)
        .arg("--output")
        .arg(&target)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("emit should run");
    assert!(status.success());

    let wire = std::fs::read(&target).expect("output should exist");
    assert_eq!(wire.len(), 38);
    assert_eq!(split_frames(&wire), vec![(0, Vec::new())]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn emit_rejects_oversized_image() {
    let dir = unique_temp_dir("emit-too-large");
    let image = dir.join("big.jpg");
    std::fs::write(&image, vec![0u8; 64]).expect("write image");

    let output = Command::new(env!("CARGO_BIN_EXE_bsonframe"))
        .arg("emit")
        .arg(&image)
        .arg("--max-document-size")
        .arg("64")
        .output()
        .expect("emit should run");

    assert_eq!(output.status.code(), Some(60));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("frame too large"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn emit_missing_file_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_bsonframe"))
        .arg("emit")
        .arg("/nonexistent/bsonframe/frame.jpg")
        .output()
        .expect("emit should run");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn looping_emit_stops_when_reader_goes_away() {
    let dir = unique_temp_dir("emit-loop");
    let image = dir.join("frame.jpg");
    std::fs::write(&image, [0xFFu8, 0xD8, 0xFF, 0xD9]).expect("write image");

    let mut child = Command::new(env!("CARGO_BIN_EXE_bsonframe"))
        .arg("--log-level")
        .arg("error")
        .arg("emit")
        .arg(&image)
        .arg("--loop")
        .arg("--interval")
        .arg("5ms")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("emit should start");

    let mut stdout = child.stdout.take().expect("stdout is piped");
    let mut first = [0u8; 42];
    stdout.read_exact(&mut first).expect("first message should arrive");
    assert_eq!(split_frames(&first), vec![(0, vec![0xFF, 0xD8, 0xFF, 0xD9])]);
    drop(stdout);

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait().expect("child should be waitable") {
            break status;
        }
        if start.elapsed() > Duration::from_secs(5) {
            let _ = child.kill();
            panic!("emit did not exit after the reader closed the pipe");
        }
        thread::sleep(Duration::from_millis(20));
    };

    assert_eq!(status.code(), Some(1));
    let mut stderr = String::new();
    child
        .stderr
        .take()
        .expect("stderr is piped")
        .read_to_string(&mut stderr)
        .expect("stderr readable");
    assert!(stderr.contains("write failed"), "stderr: {stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn layout_json_matches_wire_table() {
    let output = Command::new(env!("CARGO_BIN_EXE_bsonframe"))
        .arg("--format")
        .arg("json")
        .arg("layout")
        .arg("--jpeg-size")
        .arg("10")
        .output()
        .expect("layout should run");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("layout output should be json");
    assert_eq!(json["document_len"], 44);
    assert_eq!(json["message_len"], 48);
    assert_eq!(json["payload_offset"], 37);

    let offsets: Vec<(u64, u64)> = json["spans"]
        .as_array()
        .expect("spans should be an array")
        .iter()
        .map(|span| {
            (
                span["offset"].as_u64().unwrap(),
                span["len"].as_u64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        offsets,
        vec![(0, 4), (4, 4), (8, 5), (13, 8), (21, 11), (32, 5), (37, 10), (47, 1)]
    );
}

#[test]
fn version_prints_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_bsonframe"))
        .arg("version")
        .output()
        .expect("version should run");
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert_eq!(text.trim(), format!("bsonframe {}", env!("CARGO_PKG_VERSION")));
}
