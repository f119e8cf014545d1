//! Configuration loading from disk and the environment.
//!
//! The file is the base layer; a small set of environment variables known
//! to the original deployment (`BACKEND_ADDRESS`, `BIND_ADDRESS` and one
//! `<SERVICE>_PORT` per routed service, e.g. `CHATBOT_PORT`) override it.
//! The merged result is validated before it is accepted. Configuration is
//! loaded once at startup and immutable for the process lifetime.

use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("environment variable {var} is not a valid port: {value}")]
    EnvPort { var: String, value: String },

    #[error("invalid configuration: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, then the environment.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: ProxyConfig = toml::from_str(&content)?;
    finish(config)
}

/// Build the default configuration, overridden by the environment only.
///
/// Used when the binary is started without `--config`.
pub fn default_config() -> Result<ProxyConfig, ConfigError> {
    finish(ProxyConfig::default())
}

fn finish(mut config: ProxyConfig) -> Result<ProxyConfig, ConfigError> {
    apply_env_overrides(&mut config)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides on top of a loaded configuration.
fn apply_env_overrides(config: &mut ProxyConfig) -> Result<(), ConfigError> {
    if let Ok(address) = std::env::var("BACKEND_ADDRESS") {
        config.backend.address = address;
    }
    if let Ok(address) = std::env::var("BIND_ADDRESS") {
        config.listener.bind_address = address;
    }

    for service in &mut config.services {
        let var = format!("{}_PORT", service.name.to_uppercase().replace('-', "_"));
        if let Ok(value) = std::env::var(&var) {
            service.port = value
                .parse()
                .map_err(|_| ConfigError::EnvPort { var, value })?;
        }
    }

    Ok(())
}
