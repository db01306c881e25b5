//! Binary frame format.
//!
//! Every message in either direction is one frame (8-byte header + payload):
//!
//! ```text
//! +-------------+-------------+------------------+
//! | payload_len | request_id  | payload          |
//! |  4 bytes BE |  4 bytes BE | payload_len bytes|
//! +-------------+-------------+------------------+
//! ```
//!
//! Client-to-server payloads are UTF-8 command text; server-to-client
//! payloads are UTF-8 JSON. A request id of 0 marks a server-initiated
//! pub/sub event.

use crate::PUBSUB_REQUEST_ID;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Size of the fixed frame header in bytes (4 + 4).
pub const FRAME_HEADER_SIZE: usize = 8;

/// The fixed frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Payload length in bytes.
    pub payload_len: u32,
    /// Request id this frame correlates to (0 for pub/sub events).
    pub request_id: u32,
}

/// A parsed frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame header.
    pub header: FrameHeader,
    /// Frame payload.
    pub payload: Bytes,
}

impl Frame {
    /// Creates a new frame carrying the given payload.
    pub fn new(request_id: u32, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        Self {
            header: FrameHeader {
                payload_len: payload.len() as u32,
                request_id,
            },
            payload,
        }
    }

    /// Returns whether this frame is a server-initiated pub/sub event.
    pub fn is_pub_sub(&self) -> bool {
        self.header.request_id == PUBSUB_REQUEST_ID
    }

    /// Encodes the frame into one contiguous buffer (header + payload).
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + self.payload.len());
        buf.put_u32(self.header.payload_len);
        buf.put_u32(self.header.request_id);
        buf.put_slice(&self.payload);
        buf
    }

    /// Decodes a frame from the front of `buf`.
    ///
    /// Returns `Some(frame)` if a complete frame was consumed, `None` if
    /// more data is needed. The payload is split out of `buf` without
    /// copying.
    pub fn decode(buf: &mut BytesMut) -> Option<Self> {
        if buf.len() < FRAME_HEADER_SIZE {
            return None;
        }

        // Peek at the header without consuming
        let payload_len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let request_id = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]);

        let total_len = FRAME_HEADER_SIZE + payload_len as usize;
        if buf.len() < total_len {
            return None;
        }

        buf.advance(FRAME_HEADER_SIZE);
        let payload = buf.split_to(payload_len as usize).freeze();

        Some(Self {
            header: FrameHeader {
                payload_len,
                request_id,
            },
            payload,
        })
    }
}
