//! Connection-per-call exchange with the editor plugin.

use std::io::ErrorKind;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use godot_mcp_protocol::{Command, FRAME_DELIMITER, Reply, decode_frame, encode_frame};

use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};

const READ_CHUNK: usize = 4096;

/// Client performing one request/reply exchange per call.
///
/// Cheap to clone; holds only the connection settings. Each call opens,
/// uses and drops its own connection, so concurrent callers never share
/// state.
#[derive(Debug, Clone)]
pub struct Bridge {
    config: BridgeConfig,
}

impl Bridge {
    /// Creates a bridge with the given settings.
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    /// Creates a bridge with the default loopback settings.
    pub fn with_defaults() -> Self {
        Self::new(BridgeConfig::default())
    }

    /// Returns the connection settings.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Sends one command and waits for the reply frame.
    ///
    /// The configured deadline covers the whole call: connect, send and
    /// read. A reply whose `error` field is populated is a domain failure
    /// signaled by the editor and comes back as `Ok`; only transport-level
    /// faults produce an `Err`.
    pub async fn call(&self, command: &Command) -> BridgeResult<Reply> {
        let frame = encode_frame(command)?;
        let addr = self.config.addr();
        debug!(%addr, method = %command.method, "opening bridge connection");

        let raw = tokio::time::timeout(self.config.timeout, exchange(&addr, &frame))
            .await
            .map_err(|_| BridgeError::Timeout(self.config.timeout))??;

        debug!(bytes = raw.len(), "bridge reply received");
        Ok(decode_frame(&raw)?)
    }

    /// Liveness probe: sends `ping` and checks for the `pong` result.
    pub async fn ping(&self) -> BridgeResult<bool> {
        let reply = self.call(&Command::new("ping")).await?;
        Ok(reply.result().and_then(|v| v.as_str()) == Some("pong"))
    }
}

/// Connects, writes one frame and accumulates the reply.
///
/// The connection is dropped on every exit path, including cancellation by
/// the caller's deadline.
async fn exchange(addr: &str, frame: &[u8]) -> BridgeResult<Vec<u8>> {
    let mut stream = TcpStream::connect(addr).await.map_err(|e| {
        if e.kind() == ErrorKind::ConnectionRefused {
            BridgeError::Unreachable {
                addr: addr.to_string(),
            }
        } else {
            BridgeError::Io(e)
        }
    })?;

    stream.write_all(frame).await?;

    // Delimiter scan, not a fixed-size read: the reply may span any number
    // of TCP segments and the loop only ends on a newline or peer close.
    let mut buffer = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
        if buffer.contains(&FRAME_DELIMITER) {
            break;
        }
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::time::{Duration, Instant};
    use tokio::net::TcpListener;

    fn bridge_for(addr: SocketAddr, timeout: Duration) -> Bridge {
        Bridge::new(BridgeConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            timeout,
        })
    }

    /// Accepts one connection, reads the request line, then writes the
    /// given segments with a small pause between them.
    async fn spawn_stub(segments: Vec<&'static [u8]>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut byte = [0u8; 1];
            while let Ok(1) = stream.read(&mut byte).await {
                request.push(byte[0]);
                if byte[0] == b'\n' {
                    break;
                }
            }
            assert!(!request.is_empty(), "stub expected a request frame");
            for segment in segments {
                stream.write_all(segment).await.unwrap();
                stream.flush().await.unwrap();
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        });
        addr
    }

    #[tokio::test]
    async fn call_decodes_single_frame_reply() {
        let addr = spawn_stub(vec![b"{\"result\":\"pong\"}\n"]).await;
        let bridge = bridge_for(addr, Duration::from_secs(2));
        let reply = bridge.call(&Command::new("ping")).await.unwrap();
        assert_eq!(reply.result().and_then(|v| v.as_str()), Some("pong"));
    }

    #[tokio::test]
    async fn call_reassembles_partial_deliveries() {
        let addr = spawn_stub(vec![b"{\"resu", b"lt\":\"po", b"ng\"}\n"]).await;
        let bridge = bridge_for(addr, Duration::from_secs(2));
        let reply = bridge.call(&Command::new("ping")).await.unwrap();
        assert_eq!(reply.result().and_then(|v| v.as_str()), Some("pong"));
    }

    #[tokio::test]
    async fn call_without_trailing_newline_ends_on_close() {
        // Peer closes after a complete object with no delimiter.
        let addr = spawn_stub(vec![b"{\"result\":\"ok\"}"]).await;
        let bridge = bridge_for(addr, Duration::from_secs(2));
        let reply = bridge.call(&Command::new("get_state")).await.unwrap();
        assert_eq!(reply.result().and_then(|v| v.as_str()), Some("ok"));
    }

    #[tokio::test]
    async fn empty_close_is_empty_response_not_decode_failure() {
        let addr = spawn_stub(vec![]).await;
        let bridge = bridge_for(addr, Duration::from_secs(2));
        let err = bridge.call(&Command::new("ping")).await.unwrap_err();
        assert!(matches!(err, BridgeError::EmptyResponse));
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        // Bind then drop to obtain a port nothing is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let bridge = bridge_for(addr, Duration::from_secs(2));
        let started = Instant::now();
        let err = bridge.call(&Command::new("ping")).await.unwrap_err();
        assert!(matches!(err, BridgeError::Unreachable { .. }));
        // Refusal is reported immediately, not after the deadline.
        assert!(started.elapsed() < Duration::from_secs(1));
        let message = err.to_string();
        assert!(message.contains("Godot editor"));
    }

    #[tokio::test]
    async fn silent_peer_times_out_within_bounds() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            // Hold the connection open without ever replying.
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let bridge = bridge_for(addr, Duration::from_millis(100));
        let started = Instant::now();
        let err = bridge.call(&Command::new("ping")).await.unwrap_err();
        assert!(matches!(err, BridgeError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn repeated_timeouts_release_connections() {
        // Each timed-out call must drop its connection; the accept loop
        // observing closed streams confirms release.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buffer = [0u8; 1024];
                    // Drain until the peer drops the connection.
                    while matches!(stream.read(&mut buffer).await, Ok(n) if n > 0) {}
                });
            }
        });

        let bridge = bridge_for(addr, Duration::from_millis(50));
        for _ in 0..5 {
            let err = bridge.call(&Command::new("ping")).await.unwrap_err();
            assert!(matches!(err, BridgeError::Timeout(_)));
        }
    }

    #[tokio::test]
    async fn malformed_reply_is_decode_failure_with_raw_text() {
        let addr = spawn_stub(vec![b"this is not json\n"]).await;
        let bridge = bridge_for(addr, Duration::from_secs(2));
        let err = bridge.call(&Command::new("ping")).await.unwrap_err();
        match err {
            BridgeError::Decode { raw, .. } => assert_eq!(raw, "this is not json"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn remote_error_reply_is_ok_not_err() {
        let addr = spawn_stub(vec![b"{\"error\":\"Node not found: Enemy\"}\n"]).await;
        let bridge = bridge_for(addr, Duration::from_secs(2));
        let reply = bridge.call(&Command::new("delete_node")).await.unwrap();
        assert_eq!(reply.error(), Some("Node not found: Enemy"));
    }

    #[tokio::test]
    async fn ping_checks_for_pong() {
        let addr = spawn_stub(vec![b"{\"result\":\"pong\"}\n"]).await;
        let bridge = bridge_for(addr, Duration::from_secs(2));
        assert!(bridge.ping().await.unwrap());

        let addr = spawn_stub(vec![b"{\"result\":\"something else\"}\n"]).await;
        let bridge = bridge_for(addr, Duration::from_secs(2));
        assert!(!bridge.ping().await.unwrap());
    }
}
