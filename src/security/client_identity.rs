//! Client identity resolution.
//!
//! Precedence: `X-Real-IP`, then `X-Forwarded-For`, then the transport peer
//! address (`ip:port`). Header values are used verbatim and are not
//! validated: they are spoofable by any client that can reach the gateway
//! directly. Origin checking is the security control, not this.
//!
//! When a trusted proxy list is configured, headers are only honored from
//! those peers.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderMap;

use crate::config::ClientIdentityConfig;

pub const X_REAL_IP: &str = "x-real-ip";
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

#[derive(Debug, Clone, Default)]
pub struct ClientIdentityResolver {
    trusted_proxies: Vec<IpAddr>,
}

impl ClientIdentityResolver {
    pub fn new(trusted_proxies: Vec<IpAddr>) -> Self {
        Self { trusted_proxies }
    }

    pub fn from_config(config: &ClientIdentityConfig) -> Self {
        let trusted_proxies = config
            .trusted_proxies
            .iter()
            .filter_map(|raw| match raw.parse() {
                Ok(ip) => Some(ip),
                Err(_) => {
                    tracing::warn!(proxy = %raw, "Ignoring unparsable trusted proxy");
                    None
                }
            })
            .collect();
        Self::new(trusted_proxies)
    }

    fn trusts(&self, peer: &SocketAddr) -> bool {
        self.trusted_proxies.is_empty() || self.trusted_proxies.contains(&peer.ip())
    }

    /// Best-effort client address. Never fails.
    pub fn resolve(&self, headers: &HeaderMap, peer: SocketAddr) -> String {
        if self.trusts(&peer) {
            for name in [X_REAL_IP, X_FORWARDED_FOR] {
                if let Some(value) = non_empty_header(headers, name) {
                    if value.parse::<IpAddr>().is_err() {
                        tracing::debug!(header = name, value, peer = %peer, "Client address header is not a bare IP");
                    }
                    return value.to_string();
                }
            }
        } else if headers.contains_key(X_REAL_IP) || headers.contains_key(X_FORWARDED_FOR) {
            tracing::debug!(peer = %peer, "Ignoring proxy headers from untrusted peer");
        }
        peer.to_string()
    }
}

fn non_empty_header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}
