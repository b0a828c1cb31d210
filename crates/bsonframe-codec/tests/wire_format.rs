use std::io::Cursor;

use bsonframe_codec::{document_len, encode_and_write, Frame, FrameWriter, PREFIX_SIZE};
use bytes::{Buf, Bytes};

/// Element values a frame document may carry.
#[derive(Debug, PartialEq)]
enum Value {
    Int64(i64),
    Binary { subtype: u8, data: Vec<u8> },
}

/// Minimal BSON reader for int64 and binary elements.
fn parse_document(doc: &[u8]) -> Vec<(String, Value)> {
    let mut buf = doc;
    let declared = buf.get_u32_le() as usize;
    assert_eq!(declared, doc.len(), "document length field mismatch");

    let mut elements = Vec::new();
    loop {
        let tag = buf.get_u8();
        if tag == 0x00 {
            break;
        }
        let nul = buf.iter().position(|b| *b == 0).expect("unterminated name");
        let name = String::from_utf8(buf[..nul].to_vec()).expect("name is utf-8");
        buf.advance(nul + 1);

        let value = match tag {
            0x12 => {
                let value = i64::from_ne_bytes(buf[..8].try_into().unwrap());
                buf.advance(8);
                Value::Int64(value)
            }
            0x05 => {
                let len = buf.get_u32_le() as usize;
                let subtype = buf.get_u8();
                let data = buf[..len].to_vec();
                buf.advance(len);
                Value::Binary { subtype, data }
            }
            other => panic!("unexpected element type {other:#04x}"),
        };
        elements.push((name, value));
    }
    assert!(!buf.has_remaining(), "bytes after document terminator");
    elements
}

/// Split a stream on the outer big-endian prefix.
fn split_stream(mut wire: Bytes) -> Vec<Bytes> {
    let mut docs = Vec::new();
    while wire.has_remaining() {
        let len = wire.get_u32() as usize;
        docs.push(wire.split_to(len));
    }
    docs
}

fn decode(frame_doc: &[u8]) -> Frame {
    let elements = parse_document(frame_doc);
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].0, "pts");
    assert_eq!(elements[1].0, "frameJpeg");

    let pts = match &elements[0].1 {
        Value::Int64(v) => *v,
        other => panic!("pts has wrong type: {other:?}"),
    };
    let jpeg = match &elements[1].1 {
        Value::Binary { subtype: 0, data } => data.clone(),
        other => panic!("frameJpeg has wrong type: {other:?}"),
    };
    Frame::new(jpeg, pts)
}

#[test]
fn roundtrip_recovers_frame() {
    let cases = [
        (0usize, 0i64),
        (1, -1),
        (2, i64::MAX),
        (255, i64::MIN),
        (4096, 90_000),
        (200_000, -1_234_567_890_123),
    ];

    for (size, pts) in cases {
        let jpeg: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        let frame = Frame::new(jpeg, pts);
        let mut wire = Vec::<u8>::new();
        encode_and_write(&frame, &mut wire).unwrap();

        let expected_len = document_len(size).unwrap();
        assert_eq!(wire.len(), PREFIX_SIZE + expected_len as usize);

        let outer = u32::from_be_bytes(wire[0..4].try_into().unwrap());
        let inner = u32::from_le_bytes(wire[4..8].try_into().unwrap());
        assert_eq!(outer, expected_len);
        assert_eq!(inner, expected_len);

        let decoded = decode(&wire[PREFIX_SIZE..]);
        assert_eq!(decoded, frame, "size {size} pts {pts}");
    }
}

#[test]
fn stream_of_messages_splits_cleanly() {
    let frames: Vec<Frame> = (0..10)
        .map(|i| Frame::new(vec![i as u8; i * 37], i as i64 * 3_003))
        .collect();

    let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
    for frame in &frames {
        writer.write_frame(frame).unwrap();
    }
    assert_eq!(writer.frames_written(), frames.len() as u64);

    let docs = split_stream(Bytes::from(writer.into_inner().into_inner()));
    assert_eq!(docs.len(), frames.len());
    for (doc, frame) in docs.iter().zip(&frames) {
        assert_eq!(&decode(doc), frame);
    }
}

#[test]
fn empty_image_is_well_formed() {
    let mut wire = Vec::<u8>::new();
    encode_and_write(&Frame::new(Vec::<u8>::new(), 0), &mut wire).unwrap();

    assert_eq!(wire.len(), 38);
    let elements = parse_document(&wire[PREFIX_SIZE..]);
    assert_eq!(
        elements[1].1,
        Value::Binary {
            subtype: 0,
            data: Vec::new()
        }
    );
}
