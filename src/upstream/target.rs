//! Outbound target addressing.
//!
//! # Responsibilities
//! - Resolve the backend host per the configured strategy
//! - Construct the plain-HTTP target URL from host, port, stripped path
//!   and the original query string

use axum::http::uri::{PathAndQuery, Scheme, Uri};
use axum::http::HeaderValue;

use crate::config::{BackendConfig, HostStrategy};

/// The resolved backend address, computed once at startup.
#[derive(Debug, Clone)]
pub struct UpstreamAddr {
    /// Hostname written into every outbound URL.
    pub host: String,

    /// Explicit `Host` header for the forwarded request, only set by the
    /// `override-host-header` strategy.
    pub host_header: Option<HeaderValue>,
}

impl UpstreamAddr {
    /// Resolve the backend address per the configured strategy.
    pub fn from_config(backend: &BackendConfig) -> Self {
        match backend.host_strategy {
            HostStrategy::LiteralAddress => Self {
                host: backend.address.clone(),
                host_header: None,
            },
            HostStrategy::DerivedHostname => Self {
                host: derive_hostname(&backend.address, &backend.derived_domain),
                host_header: None,
            },
            HostStrategy::OverrideHostHeader => Self {
                host: backend.address.clone(),
                host_header: HeaderValue::from_str(&backend.override_host).ok(),
            },
        }
    }
}

/// Map a literal IPv4 address onto a wildcard-DNS hostname:
/// `165.245.177.103` + `nip.io` → `165-245-177-103.nip.io`.
fn derive_hostname(address: &str, domain: &str) -> String {
    format!("{}.{}", address.replace('.', "-"), domain)
}

/// Build the plain-HTTP URL the request is forwarded to.
///
/// The stripped path and the caller's query string are carried over
/// untouched.
pub fn build_target_url(
    host: &str,
    port: u16,
    stripped_path: &str,
    query: Option<&str>,
) -> Result<Uri, axum::http::Error> {
    let path_and_query = match query {
        Some(q) => format!("{stripped_path}?{q}"),
        None => stripped_path.to_string(),
    };

    Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(format!("{host}:{port}"))
        .path_and_query(PathAndQuery::try_from(path_and_query)?)
        .build()
}
