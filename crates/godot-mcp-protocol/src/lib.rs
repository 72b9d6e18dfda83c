//! Wire envelopes and framing for the Godot editor bridge.
//!
//! This crate defines the protocol spoken over the loopback TCP link to the
//! editor plugin.
//!
//! # Protocol Overview
//!
//! Messages are sent as newline-delimited JSON:
//! - request: one UTF-8 JSON object `{"method": <string>, "params": <object>}`
//!   followed by `\n`
//! - reply: one UTF-8 JSON object carrying either a `result` or an `error`
//!   key, followed by `\n`
//!
//! One connection carries exactly one request frame and one reply frame;
//! there is no pipelining.
//!
//! # Precondition
//!
//! The reader stops at the first newline it observes, so the plugin must not
//! emit an embedded newline inside the JSON payload before the terminating
//! one. This is a documented precondition on the editor side, not something
//! the codec defends against.
//!
//! # Example
//!
//! ```rust
//! use godot_mcp_protocol::{Command, decode_frame, encode_frame};
//!
//! let command = Command::new("ping");
//! let frame = encode_frame(&command).unwrap();
//! assert_eq!(frame, b"{\"method\":\"ping\",\"params\":{}}\n");
//!
//! let reply = decode_frame(b"{\"result\":\"pong\"}\n").unwrap();
//! assert_eq!(reply.result().and_then(|v| v.as_str()), Some("pong"));
//! ```

mod error;
mod framing;
mod types;

pub use error::{ProtocolError, ProtocolResult};
pub use framing::{FRAME_DELIMITER, decode_frame, encode_frame};
pub use types::{Command, Reply};
