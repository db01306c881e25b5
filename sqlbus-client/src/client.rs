//! High-level client API.
//!
//! One TCP connection carries monotonically numbered command responses
//! interleaved with pub/sub events (request id 0) and with late batches of
//! earlier result sets. [`Client::execute`] demultiplexes inbound frames;
//! [`Client::next_row`] walks result sets across batches;
//! [`Client::wait_for_pub_sub`] consumes buffered and live events.

use crate::connection::{Connection, ConnectionConfig};
use crate::error::ClientError;
use bytes::Bytes;
use sqlbus_protocol::{Action, Response};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::time::Instant;

/// Maximum number of pub/sub payloads buffered while awaiting command
/// responses. Past this the oldest event is dropped.
const MAX_BACKLOG: usize = 1024;

/// Client for a sqlbus server.
///
/// All operations take `&mut self`: one caller, at most one outstanding
/// request. The last error is sticky; fallible operations return `false`
/// and leave the message in [`error`](Client::error).
pub struct Client {
    config: ConnectionConfig,
    conn: Option<Connection>,
    request_id: u32,
    err: String,
    rawjson: Option<Bytes>,
    response: Response,
    /// Zero-based offset within the current batch; -1 before the first row.
    record: i64,
    columns: HashMap<String, usize>,
    backlog: VecDeque<Bytes>,
}

impl Client {
    /// Creates a disconnected client with default configuration.
    pub fn new() -> Self {
        Self::with_config(ConnectionConfig::new())
    }

    /// Creates a disconnected client with the given configuration.
    pub fn with_config(config: ConnectionConfig) -> Self {
        Self {
            config,
            conn: None,
            request_id: 0,
            err: String::new(),
            rawjson: None,
            response: Response::default(),
            record: -1,
            columns: HashMap::new(),
            backlog: VecDeque::new(),
        }
    }

    /// Connects to the server at `address` (`host:port`).
    ///
    /// An existing connection is closed first. Returns `false` and sets the
    /// error on dial failure.
    pub async fn connect(&mut self, address: &str) -> bool {
        self.disconnect().await;
        match Connection::open(address, &self.config).await {
            Ok(conn) => {
                self.conn = Some(conn);
                true
            }
            Err(e) => {
                self.set_error(e);
                false
            }
        }
    }

    /// Disconnects from the server.
    ///
    /// Issues a best-effort `close` command, then closes the socket
    /// regardless of the write outcome. A no-op when already disconnected.
    pub async fn disconnect(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            self.request_id = self.request_id.wrapping_add(1);
            let _ = conn.write_command(self.request_id, "close").await;
            conn.shutdown().await;
            tracing::debug!("disconnected");
        }
        self.backlog.clear();
        self.reset();
    }

    /// Returns whether the client currently holds a connection.
    pub fn connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Returns whether the last operation succeeded.
    pub fn ok(&self) -> bool {
        self.err.is_empty()
    }

    /// Returns whether the last operation failed.
    pub fn failed(&self) -> bool {
        !self.ok()
    }

    /// Returns the last error message, empty when [`ok`](Client::ok).
    pub fn error(&self) -> &str {
        &self.err
    }

    /// Executes a command and awaits its response.
    ///
    /// Pub/sub frames arriving in the meantime are buffered for
    /// [`wait_for_pub_sub`](Client::wait_for_pub_sub); late batches of
    /// abandoned result sets are discarded.
    pub async fn execute(&mut self, command: &str) -> bool {
        self.reset();
        let result = self.execute_inner(command).await;
        self.capture(result)
    }

    /// Sends a fire-and-forget `stream` command; no response is awaited.
    pub async fn stream(&mut self, command: &str) -> bool {
        self.reset();
        let command = format!("stream {}", command);
        let result = self.write_command(&command).await.map(|_| true);
        self.capture(result)
    }

    /// Returns the raw JSON of the last decoded response.
    pub fn json(&self) -> &str {
        self.rawjson
            .as_ref()
            .and_then(|raw| std::str::from_utf8(raw).ok())
            .unwrap_or("")
    }

    /// Returns the action of the last decoded response.
    pub fn action(&self) -> Action {
        self.response.action
    }

    /// Returns the row/object id of the last decoded response.
    pub fn id(&self) -> &str {
        &self.response.id
    }

    /// Returns the subscription id from a subscribe response or pub/sub
    /// event.
    pub fn pub_sub_id(&self) -> &str {
        &self.response.pub_sub_id
    }

    /// Returns the total number of rows in the current result set.
    pub fn row_count(&self) -> i64 {
        self.response.rows
    }

    /// Advances to the next row, transparently fetching the next batch of a
    /// multi-batch result set.
    ///
    /// Returns `false` past the last row or on error; inspect
    /// [`ok`](Client::ok) to tell the two apart.
    pub async fn next_row(&mut self) -> bool {
        while self.ok() {
            if !self.response.has_result_set() {
                return false;
            }
            self.record += 1;
            if self.record <= self.response.torow - self.response.fromrow {
                return true;
            }
            if self.response.is_last_batch() {
                // guard against walking past the final row
                self.record -= 1;
                return false;
            }
            let result = self.fetch_next_batch().await;
            if !self.capture(result) {
                return false;
            }
        }
        false
    }

    /// Returns the current row's value for `column`, or `""` when the column
    /// does not exist. Never sets the error.
    pub fn value(&self, column: &str) -> &str {
        match self.columns.get(column) {
            Some(&ordinal) => self.value_by_ordinal(ordinal),
            None => "",
        }
    }

    /// Returns the current row's value at the zero-based column `ordinal`,
    /// or `""` when out of range. Never sets the error.
    pub fn value_by_ordinal(&self, ordinal: usize) -> &str {
        if self.record < 0 {
            return "";
        }
        self.response
            .data
            .get(self.record as usize)
            .and_then(|row| row.get(ordinal))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Returns whether `column` exists in the current result set.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Returns the number of columns in the current result set.
    pub fn column_count(&self) -> usize {
        self.response.columns.len()
    }

    /// Returns the column names of the current result set.
    pub fn columns(&self) -> &[String] {
        &self.response.columns
    }

    /// Waits for a pub/sub event, draining the backlog first.
    ///
    /// Returns `false` when `timeout` elapses (not an error: the error stays
    /// empty) or on failure. One monotonic deadline covers the whole call;
    /// discarded stale frames do not restart it.
    pub async fn wait_for_pub_sub(&mut self, timeout: Duration) -> bool {
        self.reset();

        if let Some(payload) = self.backlog.pop_front() {
            let result = self.load_response(payload);
            return self.capture(result);
        }

        let deadline = Instant::now() + timeout;
        loop {
            let read = match self.conn.as_mut() {
                Some(conn) => conn.read_frame(deadline).await,
                None => Err(ClientError::NotConnected),
            };
            match read {
                // Timeout: expected outcome, not an error.
                Ok(None) => return false,
                Ok(Some(frame)) if frame.is_pub_sub() => {
                    let result = self.load_response(frame.payload);
                    return self.capture(result);
                }
                Ok(Some(frame)) => {
                    // Leftover batch of an abandoned cursor.
                    tracing::debug!(
                        request_id = frame.header.request_id,
                        "discarding stale frame while waiting for pub/sub"
                    );
                    self.reset();
                }
                Err(e) => {
                    self.set_error(e);
                    return false;
                }
            }
        }
    }

    async fn execute_inner(&mut self, command: &str) -> Result<bool, ClientError> {
        self.write_command(command).await?;
        loop {
            let frame = self.read_response_frame().await?;
            let id = frame.header.request_id;
            if id == self.request_id {
                // The response we are waiting for.
                return self.load_response(frame.payload);
            } else if frame.is_pub_sub() {
                tracing::debug!("buffering pub/sub frame received mid-command");
                self.push_backlog(frame.payload);
            } else if id < self.request_id {
                // Late batch of an earlier, abandoned result set.
                tracing::debug!(stale = id, current = self.request_id, "discarding stale frame");
                self.reset();
            } else {
                return Err(ClientError::InvalidRequestId);
            }
        }
    }

    /// Fetches the next batch of the current result set. Pub/sub frames
    /// encountered on the way are buffered, never decoded into the cursor.
    async fn fetch_next_batch(&mut self) -> Result<bool, ClientError> {
        loop {
            self.reset();
            let frame = self.read_response_frame().await?;
            if frame.is_pub_sub() {
                tracing::debug!("buffering pub/sub frame received mid-cursor");
                self.push_backlog(frame.payload);
                continue;
            }
            if frame.header.request_id != self.request_id {
                return Err(ClientError::UnexpectedFrame);
            }
            return self.load_response(frame.payload);
        }
    }

    /// Assigns the next request id and writes the command frame.
    async fn write_command(&mut self, command: &str) -> Result<(), ClientError> {
        self.request_id = self.request_id.wrapping_add(1);
        let request_id = self.request_id;
        let conn = self.conn.as_mut().ok_or(ClientError::NotConnected)?;
        conn.write_command(request_id, command).await
    }

    /// Reads one frame under the long command deadline.
    async fn read_response_frame(&mut self) -> Result<sqlbus_protocol::Frame, ClientError> {
        let deadline = Instant::now() + self.config.command_timeout;
        let conn = self.conn.as_mut().ok_or(ClientError::NotConnected)?;
        conn.read_frame(deadline)
            .await?
            .ok_or(ClientError::ReadTimedOut)
    }

    /// Decodes `payload` into the current response.
    ///
    /// On a server-reported failure (`status != "ok"`) the decoded record
    /// stays readable — `Ok(false)` with the error set to the server's
    /// message.
    fn load_response(&mut self, payload: Bytes) -> Result<bool, ClientError> {
        let response = Response::from_payload(&payload)?;
        self.rawjson = Some(payload);
        self.response = response;
        if !self.response.columns.is_empty() {
            self.columns = self
                .response
                .columns
                .iter()
                .enumerate()
                .map(|(ordinal, column)| (column.clone(), ordinal))
                .collect();
        }
        if self.response.is_ok() {
            Ok(true)
        } else {
            self.err = self.response.msg.clone();
            Ok(false)
        }
    }

    /// Buffers a pub/sub payload. The payload is split off the decoder's
    /// buffer and owned independently of future reads.
    fn push_backlog(&mut self, payload: Bytes) {
        if self.backlog.len() == MAX_BACKLOG {
            tracing::warn!("pub/sub backlog full, dropping oldest event");
            self.backlog.pop_front();
        }
        self.backlog.push_back(payload);
    }

    /// Clears the error and all command-scoped state.
    fn reset(&mut self) {
        self.err.clear();
        self.response = Response::default();
        self.rawjson = None;
        self.record = -1;
    }

    /// Records a failure: command-scoped state is reset first, then the
    /// error is set. Fatal transport errors drop the connection.
    fn set_error(&mut self, e: ClientError) {
        if e.is_fatal() {
            self.conn = None;
        }
        let msg = e.to_string();
        self.reset();
        self.err = msg;
    }

    fn capture(&mut self, result: Result<bool, ClientError>) -> bool {
        match result {
            Ok(ok) => ok,
            Err(e) => {
                self.set_error(e);
                false
            }
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
