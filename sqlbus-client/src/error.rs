//! Client error types.

use thiserror::Error;

/// Client errors.
///
/// Display strings are part of the client contract: [`crate::Client::error`]
/// surfaces them verbatim.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not connected")]
    NotConnected,

    #[error("Read timed out")]
    ReadTimedOut,

    #[error("connection closed")]
    ConnectionClosed,

    /// Received a frame whose request id is ahead of the one outstanding.
    #[error("protocol error invalid requestId")]
    InvalidRequestId,

    /// Received a non-matching, non-pub/sub frame during a cursor fetch.
    #[error("protocol error")]
    UnexpectedFrame,

    /// Server reported `status != "ok"`; carries the server's message.
    #[error("{0}")]
    Server(String),

    #[error(transparent)]
    Protocol(#[from] sqlbus_protocol::ProtocolError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Returns whether the transport is unusable after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ClientError::Io(_) | ClientError::ConnectionClosed)
    }
}
