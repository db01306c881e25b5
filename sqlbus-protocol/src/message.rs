//! JSON response record returned by the server.

use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};

/// Response status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    #[default]
    Err,
}

/// Action reported by the server in a response or pub/sub event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Status,
    Insert,
    Select,
    Delete,
    Update,
    Add,
    Remove,
    Subscribe,
    Unsubscribe,
    /// Absent or unrecognized action.
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Status => "status",
            Action::Insert => "insert",
            Action::Select => "select",
            Action::Delete => "delete",
            Action::Update => "update",
            Action::Add => "add",
            Action::Remove => "remove",
            Action::Subscribe => "subscribe",
            Action::Unsubscribe => "unsubscribe",
            Action::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// A decoded server response.
///
/// Result-set responses carry a row window `[fromrow, torow]` (1-based,
/// inclusive) out of `rows` total rows; `data` holds exactly that window.
/// `rows == 0`, `fromrow == 0` or `torow == 0` means no result set.
///
/// The window fields are signed so malformed input fails cursor arithmetic
/// safely instead of wrapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    /// `ok` or `err`.
    pub status: ResponseStatus,

    /// Human-readable message (non-empty when status is `err`).
    #[serde(default)]
    pub msg: String,

    /// Action this response answers or announces.
    #[serde(default)]
    pub action: Action,

    /// Row/object identifier, when the action produced one.
    #[serde(default)]
    pub id: String,

    /// Subscription identifier (on subscribe responses and pub/sub events).
    #[serde(default, rename = "pubsubid")]
    pub pub_sub_id: String,

    /// Total rows in the result set this response belongs to.
    #[serde(default)]
    pub rows: i64,

    /// First row of this batch within the result set (1-based).
    #[serde(default)]
    pub fromrow: i64,

    /// Last row of this batch within the result set (1-based, inclusive).
    #[serde(default)]
    pub torow: i64,

    /// Ordered column names (empty when no result set).
    #[serde(default)]
    pub columns: Vec<String>,

    /// Row data for the current batch; each row is one value per column.
    #[serde(default)]
    pub data: Vec<Vec<String>>,
}

impl Response {
    /// Decodes a response from a frame payload.
    pub fn from_payload(payload: &[u8]) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// Returns whether the server reported success.
    pub fn is_ok(&self) -> bool {
        self.status == ResponseStatus::Ok
    }

    /// Returns whether this response carries a result set.
    pub fn has_result_set(&self) -> bool {
        self.rows > 0 && self.fromrow > 0 && self.torow > 0
    }

    /// Returns whether the current batch is the last one of the result set.
    pub fn is_last_batch(&self) -> bool {
        self.rows == self.torow
    }
}
