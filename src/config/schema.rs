//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Origin that is allowed to open game connections in production.
pub const PRODUCTION_ORIGIN: &str = "https://blubber.run.place";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Origin allow-lists for CORS and connection admission.
    pub origins: OriginConfig,

    /// How client addresses are derived from proxy headers.
    pub client_identity: ClientIdentityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
///
/// The gateway sits behind a TLS-terminating reverse proxy and only ever
/// binds the loopback interface.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// TCP port to listen on.
    pub port: u16,
}

impl ListenerConfig {
    /// Loopback socket address for the configured port.
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.port))
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Origins granted cross-origin read access (exact, case-sensitive).
    pub allowed: Vec<String>,

    /// The single origin allowed to open a game connection.
    pub admission: String,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            allowed: vec![
                PRODUCTION_ORIGIN.to_string(),
                "http://localhost".to_string(),
                "http://127.0.0.1".to_string(),
                "http://localhost:5502".to_string(),
            ],
            admission: PRODUCTION_ORIGIN.to_string(),
        }
    }
}

/// Client identity resolution settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientIdentityConfig {
    /// Peers whose X-Real-IP / X-Forwarded-For headers are honored.
    /// Empty means headers are trusted from every peer.
    pub trusted_proxies: Vec<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
