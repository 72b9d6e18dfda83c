//! Newline-delimited frame encoding and decoding.
//!
//! A frame is the UTF-8 JSON text of one envelope followed by exactly one
//! `\n`:
//!
//! ```text
//! +------------------+----+
//! |  JSON payload    | \n |
//! +------------------+----+
//! ```

use crate::error::{ProtocolError, ProtocolResult};
use crate::types::{Command, Reply};

/// The byte terminating every frame.
pub const FRAME_DELIMITER: u8 = b'\n';

/// How much raw text a decode error keeps around for diagnostics.
const RAW_PREVIEW_LEN: usize = 200;

/// Encodes a command into a complete frame ready for transmission.
pub fn encode_frame(command: &Command) -> ProtocolResult<Vec<u8>> {
    let mut frame = serde_json::to_vec(command).map_err(ProtocolError::Encode)?;
    frame.push(FRAME_DELIMITER);
    Ok(frame)
}

/// Decodes a reply from the raw bytes accumulated off the wire.
///
/// Trailing whitespace (including the frame delimiter) is stripped before
/// parsing. An empty frame and a malformed frame are distinct errors; the
/// latter carries a preview of the raw text.
pub fn decode_frame(data: &[u8]) -> ProtocolResult<Reply> {
    let text = String::from_utf8_lossy(data);
    let text = text.trim();
    if text.is_empty() {
        return Err(ProtocolError::EmptyFrame);
    }
    serde_json::from_str(text).map_err(|source| ProtocolError::Decode {
        raw: preview(text),
        source,
    })
}

fn preview(text: &str) -> String {
    if text.chars().count() <= RAW_PREVIEW_LEN {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(RAW_PREVIEW_LEN).collect();
        out.push_str("...");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_terminates_with_single_newline() {
        let frame = encode_frame(&Command::new("ping")).unwrap();
        assert_eq!(frame, b"{\"method\":\"ping\",\"params\":{}}\n");
        assert_eq!(frame.iter().filter(|&&b| b == FRAME_DELIMITER).count(), 1);
    }

    #[test]
    fn decode_pong_reply() {
        let reply = decode_frame(b"{\"result\":\"pong\"}\n").unwrap();
        assert_eq!(reply.result().and_then(|v| v.as_str()), Some("pong"));
    }

    #[test]
    fn decode_strips_trailing_whitespace() {
        let reply = decode_frame(b"{\"result\":\"ok\"}\r\n  \n").unwrap();
        assert_eq!(reply.result().and_then(|v| v.as_str()), Some("ok"));
    }

    #[test]
    fn decode_empty_frame() {
        assert!(matches!(decode_frame(b""), Err(ProtocolError::EmptyFrame)));
        assert!(matches!(
            decode_frame(b" \n"),
            Err(ProtocolError::EmptyFrame)
        ));
    }

    #[test]
    fn decode_malformed_frame_keeps_raw_text() {
        let err = decode_frame(b"not json at all\n").unwrap_err();
        match err {
            ProtocolError::Decode { raw, .. } => assert_eq!(raw, "not json at all"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn decode_caps_raw_preview() {
        let garbage = format!("{{{}", "x".repeat(600));
        let err = decode_frame(garbage.as_bytes()).unwrap_err();
        match err {
            ProtocolError::Decode { raw, .. } => {
                assert!(raw.len() < garbage.len());
                assert!(raw.ends_with("..."));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn encode_then_decode_roundtrip() {
        // The stub answers the canonical ping exchange.
        let frame = encode_frame(&Command::new("ping")).unwrap();
        let request: Command = serde_json::from_slice(&frame[..frame.len() - 1]).unwrap();
        assert_eq!(request.method, "ping");
        assert!(request.params.is_empty());

        let reply = decode_frame(b"{\"result\":\"pong\"}\n").unwrap();
        assert_eq!(reply.result().and_then(|v| v.as_str()), Some("pong"));
        assert!(!reply.is_error());
    }
}
