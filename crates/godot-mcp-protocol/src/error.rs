//! Protocol error types.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding or decoding frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Failed to serialize a command to JSON.
    #[error("failed to encode command: {0}")]
    Encode(#[source] serde_json::Error),

    /// The frame contained no bytes after stripping whitespace.
    #[error("empty frame")]
    EmptyFrame,

    /// The frame contained bytes that are not a valid JSON reply.
    #[error("malformed reply: {source} (raw: {raw})")]
    Decode {
        /// A bounded preview of the raw frame text.
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}
