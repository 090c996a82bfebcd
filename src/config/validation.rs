//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Every problem is
//! reported, not just the first one.

use std::net::{IpAddr, SocketAddr};

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.port must not be 0")]
    ZeroPort,
    #[error("origins.admission must not be empty")]
    EmptyAdmissionOrigin,
    #[error("origin {0:?} is a wildcard; origins must be listed exactly")]
    WildcardOrigin(String),
    #[error("origins.allowed contains an empty entry")]
    EmptyAllowedOrigin,
    #[error("trusted proxy {0:?} is not an IP address")]
    InvalidTrustedProxy(String),
    #[error("metrics address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    let admission = config.origins.admission.trim();
    if admission.is_empty() {
        errors.push(ValidationError::EmptyAdmissionOrigin);
    } else if admission.contains('*') {
        errors.push(ValidationError::WildcardOrigin(admission.to_string()));
    }

    for origin in &config.origins.allowed {
        if origin.trim().is_empty() {
            errors.push(ValidationError::EmptyAllowedOrigin);
        } else if origin.contains('*') {
            errors.push(ValidationError::WildcardOrigin(origin.clone()));
        }
    }

    for proxy in &config.client_identity.trusted_proxies {
        if proxy.parse::<IpAddr>().is_err() {
            errors.push(ValidationError::InvalidTrustedProxy(proxy.clone()));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
