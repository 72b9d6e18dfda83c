//! Bridge error taxonomy.
//!
//! Every transport failure maps to exactly one variant; a well-formed reply
//! whose `error` field is populated is NOT a bridge error and comes back as
//! `Ok(Reply)` for the caller to surface.

use std::time::Duration;

use godot_mcp_protocol::ProtocolError;
use thiserror::Error;

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors that can occur during one bridge call.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The editor actively refused the connection. Reported immediately,
    /// never retried.
    #[error(
        "connection refused at {addr}. Is the Godot editor running with the MCP bridge plugin enabled?"
    )]
    Unreachable {
        /// The `host:port` that refused.
        addr: String,
    },

    /// The deadline elapsed before a complete reply frame was received.
    #[error("no complete reply within {0:?}")]
    Timeout(Duration),

    /// The peer closed the connection without sending any bytes. Distinct
    /// from a timeout.
    #[error("empty response from the editor")]
    EmptyResponse,

    /// Bytes were received but are not a valid JSON reply.
    #[error("malformed reply: {source} (raw: {raw})")]
    Decode {
        /// A bounded preview of the raw frame text.
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// The command could not be serialized.
    #[error("failed to encode command: {0}")]
    Encode(#[source] serde_json::Error),

    /// Any other I/O failure on the connection.
    #[error("communication error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ProtocolError> for BridgeError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::EmptyFrame => Self::EmptyResponse,
            ProtocolError::Decode { raw, source } => Self::Decode { raw, source },
            ProtocolError::Encode(source) => Self::Encode(source),
        }
    }
}
