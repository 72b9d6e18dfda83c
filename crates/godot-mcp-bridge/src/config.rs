//! Bridge connection settings.

use std::time::Duration;

/// Default host the editor plugin listens on.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port the editor plugin listens on.
pub const DEFAULT_PORT: u16 = 42069;

/// Default per-call deadline covering connect, send and read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where and how to reach the editor plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Host of the editor plugin's TCP listener.
    pub host: String,

    /// Port of the editor plugin's TCP listener.
    pub port: u16,

    /// Deadline for one whole call (not just the connect).
    pub timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl BridgeConfig {
    /// Returns the `host:port` address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_addr() {
        let config = BridgeConfig::default();
        assert_eq!(config.addr(), "127.0.0.1:42069");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
