//! Connection management.

use crate::error::ClientError;
use sqlbus_protocol::{Decoder, Encoder, Frame};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::Instant;

/// Default read buffer size (2 KiB).
pub const DEFAULT_READ_BUFFER_SIZE: usize = 2048;

/// Minimum read buffer size (512 B).
pub const MIN_READ_BUFFER_SIZE: usize = 512;

/// Maximum read buffer size (1 MiB).
pub const MAX_READ_BUFFER_SIZE: usize = 1024 * 1024;

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Dial timeout.
    pub connect_timeout: Duration,
    /// Per-frame read deadline while awaiting a command response.
    pub command_timeout: Duration,
    /// Read buffer size for socket reads.
    pub read_buffer_size: usize,
}

impl ConnectionConfig {
    pub fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(1),
            command_timeout: Duration::from_secs(180),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.clamp(MIN_READ_BUFFER_SIZE, MAX_READ_BUFFER_SIZE);
        self
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A framed TCP connection to a sqlbus server.
///
/// Reads go through a reusable buffer into an incremental [`Decoder`];
/// payloads handed out by [`read_frame`](Connection::read_frame) alias the
/// decoder's buffer and must be copied if retained past the next read.
pub struct Connection {
    stream: TcpStream,
    decoder: Decoder,
    read_buf: Vec<u8>,
}

impl Connection {
    /// Dials `address` (`host:port`) within the configured connect timeout.
    pub async fn open(address: &str, config: &ConnectionConfig) -> Result<Self, ClientError> {
        tracing::debug!("connecting to {}", address);

        let stream = tokio::time::timeout(config.connect_timeout, TcpStream::connect(address))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connect timed out"))??;

        stream.set_nodelay(true).ok();
        tracing::debug!("connected to {}", address);

        Ok(Self {
            stream,
            decoder: Decoder::new(),
            read_buf: vec![0u8; config.read_buffer_size],
        })
    }

    /// Writes one command frame: header and payload are emitted as a single
    /// contiguous write, then flushed.
    pub async fn write_command(&mut self, request_id: u32, command: &str) -> Result<(), ClientError> {
        let frame = Encoder::encode_command(request_id, command);
        tracing::debug!(request_id, bytes = frame.len(), "writing frame");
        self.stream.write_all(&frame).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Reads exactly one frame, or returns `Ok(None)` once `deadline` passes.
    ///
    /// One deadline spans however many socket reads the frame needs.
    pub async fn read_frame(&mut self, deadline: Instant) -> Result<Option<Frame>, ClientError> {
        loop {
            if let Some(frame) = self.decoder.decode_frame() {
                return Ok(Some(frame));
            }

            let n = match tokio::time::timeout_at(deadline, self.stream.read(&mut self.read_buf))
                .await
            {
                Ok(read) => read?,
                Err(_) => return Ok(None),
            };

            if n == 0 {
                tracing::debug!("connection closed by peer");
                return Err(ClientError::ConnectionClosed);
            }
            self.decoder.extend(&self.read_buf[..n]);
        }
    }

    /// Shuts the socket down, best effort.
    pub async fn shutdown(&mut self) {
        let _ = self.stream.shutdown().await;
    }
}
