//! RPC bridge to a running Godot editor.
//!
//! The bridge performs one request/reply exchange per call over a fresh
//! loopback TCP connection: connect, write one frame, read until the frame
//! delimiter (or peer close), decode, drop the connection. There is no
//! pooling, no session state and no automatic retry; a stuck or malformed
//! reply on one call cannot corrupt the next.
//!
//! # Example
//!
//! ```rust,no_run
//! use godot_mcp_bridge::{Bridge, BridgeConfig};
//! use godot_mcp_protocol::Command;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bridge = Bridge::new(BridgeConfig::default());
//!     let reply = bridge.call(&Command::new("get_scene_tree")).await?;
//!     println!("{:?}", reply.field("tree"));
//!     Ok(())
//! }
//! ```

mod bridge;
mod config;
mod error;

pub use bridge::Bridge;
pub use config::{BridgeConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT};
pub use error::{BridgeError, BridgeResult};
