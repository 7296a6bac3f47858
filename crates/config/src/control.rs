//! Controller connection configuration
//!
//! Where the scheduler finds its controller and how it talks to it.

use serde::Deserialize;
use std::time::Duration;

/// Wire transport to the controller
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Long-polling HTTP requests (default)
    #[default]
    Http,
    /// Persistent TCP connection with length-prefixed JSON frames
    Socket,
}

/// Controller configuration
///
/// # Example
///
/// ```toml
/// [control]
/// transport = "http"
/// host = "localhost"
/// port = 2023
/// tls = false
/// package = "drift"
/// reconnect_interval = "1s"
/// request_timeout = "10s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Default: http
    pub transport: Transport,

    /// Default: "localhost"
    pub host: String,

    /// Default: 2023
    pub port: u16,

    /// Use https. Self-signed certificates are accepted.
    /// Default: false
    pub tls: bool,

    /// Package name reported with every running session
    /// Default: "drift"
    pub package: String,

    /// Wait between connection attempts after a transport failure
    /// Default: 1s
    #[serde(with = "humantime_serde")]
    pub reconnect_interval: Duration,

    /// Timeout for report requests (command waits are unbounded)
    /// Default: 10s
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Http,
            host: "localhost".to_string(),
            port: 2023,
            tls: false,
            package: "drift".to_string(),
            reconnect_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ControlConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL for the HTTP transport, with a trailing slash
    pub fn base_url(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{scheme}://{}/", self.addr())
    }
}
