//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Enforce the prefix-distinctness invariant that makes first-match
//!   routing deterministic
//! - Validate value ranges (nonzero ports, non-empty addresses)
//! - Check strategy-specific fields are present
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: ProxyConfig -> Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::schema::{HostStrategy, ProxyConfig};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("service `{name}`: prefix `{prefix}` must start with `/`")]
    PrefixMissingLeadingSlash { name: String, prefix: String },

    #[error("service `{name}`: prefix `{prefix}` must not end with `/`")]
    PrefixTrailingSlash { name: String, prefix: String },

    #[error("service `{name}`: prefix must be more specific than `/`")]
    PrefixIsRoot { name: String },

    #[error("duplicate prefix `{prefix}`")]
    DuplicatePrefix { prefix: String },

    #[error(
        "prefixes `{shorter}` and `{longer}` are nested; first-match routing \
         would depend on declaration order"
    )]
    NestedPrefixes { shorter: String, longer: String },

    #[error("service `{name}`: port must be nonzero")]
    ZeroPort { name: String },

    #[error("backend address must not be empty")]
    EmptyBackendAddress,

    #[error("host strategy `derived-hostname` requires backend.derived_domain")]
    MissingDerivedDomain,

    #[error("host strategy `override-host-header` requires backend.override_host")]
    MissingOverrideHost,

    #[error("cors default_origin must not be empty")]
    EmptyDefaultOrigin,

    #[error("cors origin `{origin}` must carry a scheme (http:// or https://)")]
    OriginMissingScheme { origin: String },

    #[error("cors origin `{origin}` is not a valid header value")]
    OriginNotHeaderSafe { origin: String },

    #[error("forward.client_ip_header must not be empty")]
    EmptyClientIpHeader,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_services(config, &mut errors);
    validate_backend(config, &mut errors);
    validate_cors(config, &mut errors);

    if config.forward.client_ip_header.trim().is_empty() {
        errors.push(ValidationError::EmptyClientIpHeader);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_services(config: &ProxyConfig, errors: &mut Vec<ValidationError>) {
    for service in &config.services {
        if !service.prefix.starts_with('/') {
            errors.push(ValidationError::PrefixMissingLeadingSlash {
                name: service.name.clone(),
                prefix: service.prefix.clone(),
            });
        }
        if service.prefix == "/" {
            errors.push(ValidationError::PrefixIsRoot {
                name: service.name.clone(),
            });
        } else if service.prefix.ends_with('/') {
            errors.push(ValidationError::PrefixTrailingSlash {
                name: service.name.clone(),
                prefix: service.prefix.clone(),
            });
        }
        if service.port == 0 {
            errors.push(ValidationError::ZeroPort {
                name: service.name.clone(),
            });
        }
    }

    // Pairwise checks keep the match loop order-independent: no duplicates,
    // and no prefix may extend another across a `/` boundary.
    for (i, a) in config.services.iter().enumerate() {
        for b in config.services.iter().skip(i + 1) {
            if a.prefix == b.prefix {
                errors.push(ValidationError::DuplicatePrefix {
                    prefix: a.prefix.clone(),
                });
            } else if b.prefix.starts_with(&format!("{}/", a.prefix)) {
                errors.push(ValidationError::NestedPrefixes {
                    shorter: a.prefix.clone(),
                    longer: b.prefix.clone(),
                });
            } else if a.prefix.starts_with(&format!("{}/", b.prefix)) {
                errors.push(ValidationError::NestedPrefixes {
                    shorter: b.prefix.clone(),
                    longer: a.prefix.clone(),
                });
            }
        }
    }
}

fn validate_backend(config: &ProxyConfig, errors: &mut Vec<ValidationError>) {
    if config.backend.address.trim().is_empty() {
        errors.push(ValidationError::EmptyBackendAddress);
    }

    match config.backend.host_strategy {
        HostStrategy::DerivedHostname => {
            if config.backend.derived_domain.trim().is_empty() {
                errors.push(ValidationError::MissingDerivedDomain);
            }
        }
        HostStrategy::OverrideHostHeader => {
            if config.backend.override_host.trim().is_empty() {
                errors.push(ValidationError::MissingOverrideHost);
            }
        }
        HostStrategy::LiteralAddress => {}
    }
}

fn validate_cors(config: &ProxyConfig, errors: &mut Vec<ValidationError>) {
    if config.cors.default_origin.trim().is_empty() {
        errors.push(ValidationError::EmptyDefaultOrigin);
    }

    let origins = config
        .cors
        .allowed_origins
        .iter()
        .chain(std::iter::once(&config.cors.default_origin));

    for origin in origins {
        if origin.trim().is_empty() {
            continue;
        }
        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            errors.push(ValidationError::OriginMissingScheme {
                origin: origin.clone(),
            });
        }
        if HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::OriginNotHeaderSafe {
                origin: origin.clone(),
            });
        }
    }
}
