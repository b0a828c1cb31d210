use std::convert::Infallible;

use bytes::{BufMut, BytesMut};

use crate::error::{Result, WritePhase};
use crate::frame::Frame;
use crate::layout::{document_len, Field, FIELDS, PREFIX_SIZE, SUBTYPE_GENERIC};

/// Destination for the pieces of an encoded message.
pub(crate) trait Emit {
    type Error;

    fn emit(&mut self, phase: WritePhase, bytes: &[u8]) -> std::result::Result<(), Self::Error>;
}

impl Emit for BytesMut {
    type Error = Infallible;

    fn emit(&mut self, _phase: WritePhase, bytes: &[u8]) -> std::result::Result<(), Infallible> {
        self.put_slice(bytes);
        Ok(())
    }
}

/// Emit the outer prefix and the full document for `frame`.
///
/// `document_len` must come from the size computation for this frame.
pub(crate) fn emit_message<E: Emit + ?Sized>(
    frame: &Frame,
    document_len: u32,
    out: &mut E,
) -> std::result::Result<(), E::Error> {
    out.emit(WritePhase::Framing, &document_len.to_be_bytes())?;
    out.emit(WritePhase::DocumentHeader, &document_len.to_le_bytes())?;

    for field in FIELDS {
        out.emit(WritePhase::FieldName, &[field.tag()])?;
        out.emit(WritePhase::FieldName, field.name().as_bytes())?;
        out.emit(WritePhase::FieldName, &[0x00])?;

        match field {
            // Host byte order, matching existing readers.
            Field::Pts => out.emit(WritePhase::FieldValue, &frame.pts.to_ne_bytes())?,
            Field::FrameJpeg => {
                // Bounded by the document length check.
                let jpeg_len = frame.jpeg_size() as u32;
                out.emit(WritePhase::FieldValue, &jpeg_len.to_le_bytes())?;
                out.emit(WritePhase::FieldValue, &[SUBTYPE_GENERIC])?;
                out.emit(WritePhase::Payload, &frame.jpeg)?;
            }
        }
    }

    out.emit(WritePhase::Terminator, &[0x00])
}

/// Append one complete message (prefix + document) for `frame` to `dst`.
///
/// Produces exactly the bytes [`encode_and_write`](crate::encode_and_write)
/// writes to a sink.
pub fn encode_message(frame: &Frame, dst: &mut BytesMut) -> Result<()> {
    let document_len = document_len(frame.jpeg_size())?;
    encode_message_with_len(frame, document_len, dst);
    Ok(())
}

pub(crate) fn encode_message_with_len(frame: &Frame, document_len: u32, dst: &mut BytesMut) {
    let start = dst.len();
    dst.reserve(PREFIX_SIZE + document_len as usize);
    let Ok(()) = emit_message(frame, document_len, dst);
    debug_assert_eq!(dst.len() - start, PREFIX_SIZE + document_len as usize);
}
