//! Encoder and decoder for sqlbus frames.

use crate::frame::Frame;
use bytes::{Bytes, BytesMut};

/// Encodes outgoing commands into frames.
pub struct Encoder;

impl Encoder {
    /// Encodes a command string into one contiguous frame buffer.
    pub fn encode_command(request_id: u32, command: &str) -> BytesMut {
        Frame::new(request_id, Bytes::copy_from_slice(command.as_bytes())).encode()
    }
}

/// Incremental frame decoder over a growable buffer.
///
/// Socket reads are appended with [`extend`](Decoder::extend); complete
/// frames are pulled off the front with [`decode_frame`](Decoder::decode_frame).
/// The buffer grows as needed to hold a frame larger than any single read.
pub struct Decoder {
    buffer: BytesMut,
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(2048),
        }
    }

    /// Appends data to the internal buffer.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Attempts to decode the next frame from the buffer.
    pub fn decode_frame(&mut self) -> Option<Frame> {
        Frame::decode(&mut self.buffer)
    }

    /// Returns the number of bytes currently buffered.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Clears the internal buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
