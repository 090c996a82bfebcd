//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable selecting the listening port.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid PORT value {0:?}")]
    Port(String),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    let config: GatewayConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply the `PORT` environment variable on top of a loaded config.
pub fn apply_env_overrides(config: &mut GatewayConfig) -> Result<(), ConfigError> {
    apply_port_override(config, std::env::var(PORT_ENV).ok().as_deref())
}

fn apply_port_override(config: &mut GatewayConfig, port: Option<&str>) -> Result<(), ConfigError> {
    match port.map(str::trim) {
        None | Some("") => {
            tracing::info!(port = config.listener.port, "Port not specified, using configured port");
            Ok(())
        }
        Some(raw) => {
            let port = raw
                .parse::<u16>()
                .ok()
                .filter(|p| *p != 0)
                .ok_or_else(|| ConfigError::Port(raw.to_string()))?;
            config.listener.port = port;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_file_with_defaults() {
        let config = parse_config(
            r#"
            [listener]
            port = 9000

            [origins]
            allowed = ["https://play.example"]
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.port, 9000);
        assert_eq!(config.origins.allowed, vec!["https://play.example".to_string()]);
        assert_eq!(config.origins.admission, "https://blubber.run.place");
        assert!(config.client_identity.trusted_proxies.is_empty());
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.listener.bind_address().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn rejects_invalid_values() {
        let err = parse_config("[origins]\nadmission = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("origins.admission"));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(parse_config("[listener"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn port_override() {
        let mut config = GatewayConfig::default();
        apply_port_override(&mut config, None).unwrap();
        assert_eq!(config.listener.port, 8080);

        apply_port_override(&mut config, Some("")).unwrap();
        assert_eq!(config.listener.port, 8080);

        apply_port_override(&mut config, Some("3000")).unwrap();
        assert_eq!(config.listener.port, 3000);

        assert!(matches!(
            apply_port_override(&mut config, Some("http")),
            Err(ConfigError::Port(_))
        ));
        assert!(matches!(
            apply_port_override(&mut config, Some("0")),
            Err(ConfigError::Port(_))
        ));
        assert_eq!(config.listener.port, 3000);
    }
}
