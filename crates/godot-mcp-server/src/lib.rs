//! MCP server for driving the Godot editor.
//!
//! Exposes the editor plugin's command set as MCP tools over stdio. Every
//! tool is thin marshaling: build a [`godot_mcp_protocol::Command`], send
//! it through the [`godot_mcp_bridge::Bridge`], and project the reply into
//! a human-readable string. Action vocabularies and JSON payloads are
//! validated locally before anything touches the network.

pub mod actions;
pub mod cli;
pub mod tools;

pub use tools::GodotMcp;
