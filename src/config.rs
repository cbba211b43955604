//! Configuration Module
//!
//! Handles loading and managing node configuration from environment
//! variables.

use std::env;

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Per-group cache capacity in bytes (0 = unbounded)
    pub cache_bytes: u64,
    /// HTTP server port
    pub server_port: u16,
    /// This node's advertised base URL
    pub self_url: String,
    /// All cluster members, including this node
    pub peers: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BYTES` - Per-group capacity in bytes (default: 64 MiB)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SELF_URL` - This node's base URL (default: http://localhost:3000)
    /// - `PEERS` - Comma-separated peer base URLs (default: SELF_URL)
    pub fn from_env() -> Self {
        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        let self_url =
            env::var("SELF_URL").unwrap_or_else(|_| format!("http://localhost:{server_port}"));

        let peers = env::var("PEERS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_else(|_| vec![self_url.clone()]);

        Self {
            cache_bytes: env::var("CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(64 * 1024 * 1024),
            server_port,
            self_url,
            peers,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_bytes: 64 * 1024 * 1024,
            server_port: 3000,
            self_url: String::from("http://localhost:3000"),
            peers: vec![String::from("http://localhost:3000")],
        }
    }
}
