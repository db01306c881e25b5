//! Protocol error type.

use thiserror::Error;

/// Errors raised while decoding server payloads.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_passthrough() {
        let err: ProtocolError = serde_json::from_slice::<serde_json::Value>(b"{oops")
            .unwrap_err()
            .into();
        // The display string is the parser's own message.
        assert!(err.to_string().contains("key"));
    }
}
