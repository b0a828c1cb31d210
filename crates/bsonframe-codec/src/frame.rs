use bytes::Bytes;

/// One captured video frame: a JPEG image and its presentation timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// JPEG-compressed picture. May be empty.
    pub jpeg: Bytes,
    /// Presentation timestamp in stream time base units.
    pub pts: i64,
}

impl Frame {
    /// Create a new frame.
    pub fn new(jpeg: impl Into<Bytes>, pts: i64) -> Self {
        Self {
            jpeg: jpeg.into(),
            pts,
        }
    }

    /// Length of the image payload in bytes.
    pub fn jpeg_size(&self) -> usize {
        self.jpeg.len()
    }
}
