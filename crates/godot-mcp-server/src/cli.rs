//! Command-line interface definition.

use std::time::Duration;

use clap::Parser;

use godot_mcp_bridge::{BridgeConfig, DEFAULT_HOST, DEFAULT_PORT};

/// godot-mcp - MCP server bridging agents to a running Godot editor
#[derive(Debug, Parser)]
#[command(name = "godot-mcp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Host where the editor bridge plugin listens
    #[arg(long, env = "GODOT_MCP_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port of the editor bridge plugin
    #[arg(long, env = "GODOT_MCP_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Deadline for one editor call, in seconds
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,
}

impl Cli {
    /// Returns the bridge settings selected by the flags.
    pub fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig {
            host: self.host.clone(),
            port: self.port,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_plugin() {
        let cli = Cli::parse_from(["godot-mcp"]);
        let config = cli.bridge_config();
        assert_eq!(config.addr(), "127.0.0.1:42069");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!cli.debug);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "godot-mcp",
            "--host",
            "10.0.0.2",
            "--port",
            "9000",
            "--timeout",
            "1",
        ]);
        let config = cli.bridge_config();
        assert_eq!(config.addr(), "10.0.0.2:9000");
        assert_eq!(config.timeout, Duration::from_secs(1));
    }
}
