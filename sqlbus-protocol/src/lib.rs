//! # sqlbus-protocol
//!
//! Wire protocol implementation for sqlbus.
//!
//! This crate provides:
//! - Length-prefixed binary framing with request-id correlation
//! - The JSON response record returned by the server
//! - Streaming encoder/decoder for socket reads

pub mod codec;
pub mod error;
pub mod frame;
pub mod message;

pub use codec::{Decoder, Encoder};
pub use error::ProtocolError;
pub use frame::{Frame, FrameHeader, FRAME_HEADER_SIZE};
pub use message::{Action, Response, ResponseStatus};

/// Default port for a sqlbus server.
pub const DEFAULT_PORT: u16 = 7777;

/// Request id reserved for server-initiated pub/sub events.
pub const PUBSUB_REQUEST_ID: u32 = 0;
